//! Generation record model and DTOs.
//!
//! One row per produced result item. Rows are written best-effort after
//! credit settlement and are never updated or deleted by the pipeline.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use viralthumb_core::types::{AccountId, DbId, Timestamp};

/// A row from the `generations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Generation {
    pub id: DbId,
    pub account_id: AccountId,
    pub prompt: String,
    pub output_url: String,
    pub credits_used: i32,
    pub title: Option<String>,
    pub description: Option<String>,
    pub created_at: Timestamp,
}

/// Input for creating a new generation record.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGeneration {
    pub account_id: AccountId,
    pub prompt: String,
    pub output_url: String,
    pub credits_used: i32,
    pub title: Option<String>,
    pub description: Option<String>,
}
