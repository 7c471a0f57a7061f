//! Repository for the `templates` table.

use sqlx::PgPool;

use crate::models::template::Template;

const COLUMNS: &str = "id, name, description, preview_url, is_active, created_at";

/// Provides read operations for the template catalog.
pub struct TemplateRepo;

impl TemplateRepo {
    /// List all active templates ordered by name.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Template>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM templates WHERE is_active = true ORDER BY name");
        sqlx::query_as::<_, Template>(&query).fetch_all(pool).await
    }
}
