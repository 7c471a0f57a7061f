//! Collaborator contracts consumed by the generation pipeline.
//!
//! Each external system is modeled as a narrow async trait so the
//! orchestrator can be exercised against in-process doubles. Production
//! adapters live in the API crate's engine module.

use async_trait::async_trait;
use uuid::Uuid;
use viralthumb_core::types::AccountId;

// ---------------------------------------------------------------------------
// Image generation
// ---------------------------------------------------------------------------

/// The external image-generation capability.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Render one variation, returning an inline-encoded image payload
    /// (a `data:` URL). Each call is independent; a failure here must not
    /// abort the rest of the batch.
    async fn generate_variation(
        &self,
        prompt: &str,
        style: &str,
        reference_images: &[String],
        index: u32,
    ) -> Result<String, GenerateError>;
}

/// A single variation call failed.
#[derive(Debug, thiserror::Error)]
#[error("Image generation failed: {0}")]
pub struct GenerateError(pub String);

// ---------------------------------------------------------------------------
// Metadata suggestion
// ---------------------------------------------------------------------------

/// The external text capability producing titles and a description.
#[async_trait]
pub trait MetadataGenerator: Send + Sync {
    /// Suggest one title per image plus a shared description, keyed to the
    /// prompt and the (now-durable) result URLs.
    async fn suggest_metadata(
        &self,
        prompt: &str,
        style: &str,
        image_urls: &[String],
    ) -> Result<MetadataSuggestion, MetadataError>;
}

/// Suggested batch metadata.
#[derive(Debug, Clone, Default)]
pub struct MetadataSuggestion {
    pub titles: Vec<String>,
    pub description: String,
}

/// The metadata call failed or returned an unusable payload.
#[derive(Debug, thiserror::Error)]
#[error("Metadata suggestion failed: {0}")]
pub struct MetadataError(pub String);

// ---------------------------------------------------------------------------
// Durable object store
// ---------------------------------------------------------------------------

/// The durable object store accepting binary payloads.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store an inline payload durably, returning its stable public URL.
    async fn store(
        &self,
        account_id: AccountId,
        item_id: Uuid,
        data_url: &str,
    ) -> Result<String, StoreError>;
}

/// A single upload failed; the item degrades to its inline payload.
#[derive(Debug, thiserror::Error)]
#[error("Durable storage failed: {0}")]
pub struct StoreError(pub String);

// ---------------------------------------------------------------------------
// Credit ledger
// ---------------------------------------------------------------------------

/// The relational store's atomic credit operation -- the single
/// correctness-critical interface in the system.
#[async_trait]
pub trait CreditLedger: Send + Sync {
    /// Atomically check-and-decrement `amount` credits, returning the
    /// authoritative post-deduction balance. `expected_balance` is the
    /// caller's cached hint and must never participate in the arithmetic.
    async fn deduct(
        &self,
        account_id: AccountId,
        expected_balance: i32,
        amount: i32,
    ) -> Result<i32, LedgerError>;
}

/// Failure modes of the atomic deduction.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The authoritative balance was below the requested amount (the cached
    /// pre-check value was stale).
    #[error("Insufficient credits: authoritative balance {balance}")]
    Insufficient { balance: i32 },

    /// The ledger could not be reached or refused for a non-balance reason.
    #[error("Credit ledger unavailable: {0}")]
    Unavailable(String),
}

// ---------------------------------------------------------------------------
// Generation archive
// ---------------------------------------------------------------------------

/// The relational store's best-effort generation-record sink.
#[async_trait]
pub trait GenerationArchive: Send + Sync {
    /// Persist one generation record. Failures are logged and swallowed by
    /// the caller; a missing record never blocks the user's result.
    async fn record(&self, record: NewGenerationRecord) -> Result<(), ArchiveError>;
}

/// One generation record to persist.
#[derive(Debug, Clone)]
pub struct NewGenerationRecord {
    pub account_id: AccountId,
    pub prompt: String,
    pub output_url: String,
    pub credits_used: i32,
    pub title: String,
    pub description: String,
}

/// A single record insert failed.
#[derive(Debug, thiserror::Error)]
#[error("Failed to persist generation record: {0}")]
pub struct ArchiveError(pub String);
