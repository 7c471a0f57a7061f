//! Repository for the `profiles` table.
//!
//! Owns the atomic credit decrement -- the one correctness-critical
//! statement in the system. The balance guard and the decrement execute as
//! a single row-level UPDATE, so two concurrent submissions can never both
//! spend the same credits.

use sqlx::PgPool;
use viralthumb_core::types::AccountId;

use crate::models::profile::{Profile, ProvisionProfile};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, full_name, email, avatar_url, credits, plan, role, \
                        deleted_at, created_at, updated_at";

/// Failure modes of [`ProfileRepo::deduct_credits`].
#[derive(Debug, thiserror::Error)]
pub enum CreditDeductionError {
    /// The account's live balance was below the requested amount.
    #[error("Insufficient credits: balance {balance}, requested {requested}")]
    Insufficient { balance: i32, requested: i32 },

    /// No live (non-deleted) profile row exists for the account.
    #[error("Profile not found for account {0}")]
    NotFound(AccountId),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Provides read, provisioning, and credit operations for profiles.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Find a live profile by account id. Soft-deleted rows are invisible.
    pub async fn find_by_id(pool: &PgPool, id: AccountId) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Provision a profile on first authenticated sight.
    ///
    /// Upserts keyed on the identity provider's subject id. An existing row
    /// keeps its credits, plan, and role; only the contact fields refresh.
    /// New rows receive the schema defaults (50 credits, free plan, user
    /// role).
    pub async fn provision(pool: &PgPool, input: &ProvisionProfile) -> Result<Profile, sqlx::Error> {
        let query = format!(
            "INSERT INTO profiles (id, username, full_name, email, avatar_url)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (id) DO UPDATE SET
                email = EXCLUDED.email,
                full_name = EXCLUDED.full_name,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(input.id)
            .bind(&input.username)
            .bind(&input.full_name)
            .bind(&input.email)
            .bind(&input.avatar_url)
            .fetch_one(pool)
            .await
    }

    /// Atomically deduct `amount` credits from an account, returning the
    /// authoritative post-deduction balance.
    ///
    /// `expected_balance` is the caller's cached value. It is advisory only:
    /// it never participates in the arithmetic, and a divergence is logged
    /// so stale optimistic state is visible in traces.
    pub async fn deduct_credits(
        pool: &PgPool,
        id: AccountId,
        expected_balance: i32,
        amount: i32,
    ) -> Result<i32, CreditDeductionError> {
        let updated: Option<(i32,)> = sqlx::query_as(
            "UPDATE profiles
             SET credits = credits - $2, updated_at = NOW()
             WHERE id = $1 AND credits >= $2 AND deleted_at IS NULL
             RETURNING credits",
        )
        .bind(id)
        .bind(amount)
        .fetch_optional(pool)
        .await?;

        if let Some((balance,)) = updated {
            if balance != expected_balance - amount {
                tracing::warn!(
                    account_id = %id,
                    expected = expected_balance - amount,
                    confirmed = balance,
                    "Cached credit balance was stale at settlement",
                );
            }
            return Ok(balance);
        }

        // The guarded update matched no row: either the profile is missing
        // or the balance was too low. Classify with a plain read.
        let current: Option<(i32,)> =
            sqlx::query_as("SELECT credits FROM profiles WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .fetch_optional(pool)
                .await?;

        match current {
            Some((balance,)) => Err(CreditDeductionError::Insufficient {
                balance,
                requested: amount,
            }),
            None => Err(CreditDeductionError::NotFound(id)),
        }
    }
}
