//! Handlers for the caller's own profile.
//!
//! Routes:
//! - `GET /profile` -- fetch (provisioning on first sight)

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use viralthumb_core::account;
use viralthumb_db::models::profile::{Profile, ProfileResponse, ProvisionProfile};
use viralthumb_db::repositories::ProfileRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/profile
///
/// Returns the caller's profile. A first-time caller is provisioned with
/// the starting credit grant.
pub async fn get_profile(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let profile = find_or_provision(&state, &auth).await?;

    Ok(Json(DataResponse {
        data: ProfileResponse::from(profile),
    }))
}

/// Load the caller's profile, provisioning it from token claims when no
/// row exists yet. Fallback identity fields follow the provisioning
/// defaults in `viralthumb_core::account`.
pub(crate) async fn find_or_provision(
    state: &AppState,
    auth: &AuthUser,
) -> Result<Profile, AppError> {
    if let Some(profile) = ProfileRepo::find_by_id(&state.pool, auth.account_id).await? {
        return Ok(profile);
    }

    let username = auth
        .username
        .clone()
        .unwrap_or_else(|| account::fallback_username(auth.account_id));

    let input = ProvisionProfile {
        id: auth.account_id,
        email: auth.email.clone().unwrap_or_default(),
        username: username.clone(),
        full_name: auth
            .name
            .clone()
            .unwrap_or_else(|| account::DEFAULT_FULL_NAME.to_string()),
        avatar_url: account::seeded_avatar_url(&username),
    };

    tracing::info!(account_id = %auth.account_id, username = %username, "Provisioning profile");

    Ok(ProfileRepo::provision(&state.pool, &input).await?)
}
