//! Profile entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use viralthumb_core::types::{AccountId, Timestamp};

/// Full profile row from the `profiles` table.
///
/// `credits` is guarded non-negative at the schema level and is only ever
/// written by [`crate::repositories::ProfileRepo::deduct_credits`].
#[derive(Debug, Clone, FromRow)]
pub struct Profile {
    pub id: AccountId,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub avatar_url: String,
    pub credits: i32,
    pub plan: String,
    pub role: String,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for provisioning a profile on first authenticated sight.
#[derive(Debug, Clone, Deserialize)]
pub struct ProvisionProfile {
    pub id: AccountId,
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub avatar_url: String,
}

/// Profile representation for API responses (soft-delete bookkeeping omitted).
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub id: AccountId,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub avatar_url: String,
    pub credits: i32,
    pub plan: String,
    pub role: String,
    pub created_at: Timestamp,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            username: profile.username,
            full_name: profile.full_name,
            email: profile.email,
            avatar_url: profile.avatar_url,
            credits: profile.credits,
            plan: profile.plan,
            role: profile.role,
            created_at: profile.created_at,
        }
    }
}
