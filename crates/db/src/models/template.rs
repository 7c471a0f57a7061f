//! Template catalog model.
//!
//! Templates are read-only to this system; authoring happens elsewhere.

use serde::Serialize;
use sqlx::FromRow;
use viralthumb_core::types::{DbId, Timestamp};

/// A row from the `templates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Template {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub preview_url: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
}
