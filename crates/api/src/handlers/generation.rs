//! Handlers for the credit-gated generation pipeline.
//!
//! Routes:
//! - `POST /generations` -- submit a generation batch
//! - `GET  /generations` -- paginated generation history

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use viralthumb_core::generation;
use viralthumb_db::repositories::GenerationRepo;
use viralthumb_pipeline::{AccountContext, GenerationRequest};

use crate::error::{AppError, AppResult};
use crate::handlers::profile::find_or_provision;
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Style applied when the caller picks no template.
const DEFAULT_STYLE: &str = "MrBeast Style (High Saturation)";

/// Request body for a generation submission.
#[derive(Debug, Deserialize)]
pub struct SubmitGenerationRequest {
    pub prompt: String,
    pub style: Option<String>,
    /// Inline-encoded reference images (`data:` URLs), at most three.
    #[serde(default)]
    pub reference_images: Vec<String>,
}

/// POST /api/v1/generations
///
/// Runs the full pipeline synchronously and returns the displayable items
/// plus the authoritative credit balance. Pipeline failures map to typed
/// error payloads; the insufficient-credits payload still carries any
/// already-produced items.
pub async fn submit_generation(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SubmitGenerationRequest>,
) -> AppResult<impl IntoResponse> {
    // Guard the request shape before touching the database, so a bad
    // submission has no side effect at all (not even provisioning).
    generation::validate_submission(&input.prompt, input.reference_images.len())
        .map_err(AppError::Core)?;

    let profile = find_or_provision(&state, &auth).await?;
    let account = AccountContext {
        account_id: profile.id,
        displayed_balance: profile.credits,
    };

    let request = GenerationRequest {
        prompt: input.prompt,
        style: input.style.unwrap_or_else(|| DEFAULT_STYLE.to_string()),
        reference_images: input.reference_images,
    };

    tracing::info!(
        account_id = %account.account_id,
        displayed_balance = account.displayed_balance,
        "Generation batch submitted",
    );

    let outcome = state.pipeline.submit(account, request).await?;

    Ok(Json(DataResponse { data: outcome }))
}

/// GET /api/v1/generations
///
/// The caller's generation history, newest first.
pub async fn list_generations(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let rows =
        GenerationRepo::list_for_account(&state.pool, auth.account_id, params.limit, params.offset)
            .await?;

    Ok(Json(DataResponse { data: rows }))
}
