//! Repository for the `generations` table.

use sqlx::PgPool;
use viralthumb_core::types::AccountId;

use crate::models::generation::{CreateGeneration, Generation};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, account_id, prompt, output_url, credits_used, title, description, created_at";

/// Default page size for history listings.
const DEFAULT_PAGE_SIZE: i64 = 20;

/// Hard ceiling on page size for history listings.
const MAX_PAGE_SIZE: i64 = 100;

/// Provides insert and history operations for generation records.
pub struct GenerationRepo;

impl GenerationRepo {
    /// Insert a new generation record, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateGeneration) -> Result<Generation, sqlx::Error> {
        let query = format!(
            "INSERT INTO generations (account_id, prompt, output_url, credits_used, title, description)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Generation>(&query)
            .bind(input.account_id)
            .bind(&input.prompt)
            .bind(&input.output_url)
            .bind(input.credits_used)
            .bind(&input.title)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// List an account's generation records, newest first.
    ///
    /// `limit` is clamped to `1..=100` (default 20); `offset` floors at 0.
    pub async fn list_for_account(
        pool: &PgPool,
        account_id: AccountId,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Generation>, sqlx::Error> {
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let offset = offset.unwrap_or(0).max(0);

        let query = format!(
            "SELECT {COLUMNS} FROM generations
             WHERE account_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Generation>(&query)
            .bind(account_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
