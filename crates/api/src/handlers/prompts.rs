//! Handler for prompt enhancement.
//!
//! Routes:
//! - `POST /prompts/enhance` -- rewrite a concept for the image model

use std::time::Duration;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use viralthumb_core::error::CoreError;
use viralthumb_core::generation::TEXT_MODEL_TIMEOUT_SECS;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EnhancePromptRequest {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct EnhancedPrompt {
    pub prompt: String,
}

/// POST /api/v1/prompts/enhance
///
/// Best-effort: on model failure, timeout, or an empty answer, the input
/// prompt comes back unchanged.
pub async fn enhance_prompt(
    _auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<EnhancePromptRequest>,
) -> AppResult<impl IntoResponse> {
    if input.prompt.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Prompt must not be empty".to_string(),
        )));
    }

    let budget = Duration::from_secs(TEXT_MODEL_TIMEOUT_SECS);
    let prompt = match tokio::time::timeout(budget, state.genai.enhance_prompt(&input.prompt)).await
    {
        Ok(Ok(enhanced)) if !enhanced.trim().is_empty() => enhanced,
        Ok(Ok(_)) => input.prompt,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Prompt enhancement failed; returning input unchanged");
            input.prompt
        }
        Err(_) => {
            tracing::warn!("Prompt enhancement timed out; returning input unchanged");
            input.prompt
        }
    };

    Ok(Json(DataResponse {
        data: EnhancedPrompt { prompt },
    }))
}
