//! Handlers for the style template catalog.
//!
//! Routes:
//! - `GET /templates` -- list active templates

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use viralthumb_db::repositories::TemplateRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/templates
///
/// All active templates ordered by name.
pub async fn list_templates(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let templates = TemplateRepo::list_active(&state.pool).await?;

    Ok(Json(DataResponse { data: templates }))
}
