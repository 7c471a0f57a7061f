//! Request, per-item outcome, and batch outcome types.

use serde::Serialize;
use viralthumb_core::generation::CreditState;
use viralthumb_core::types::AccountId;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Explicit account context injected per submission.
///
/// Passed in by the caller rather than read from ambient state so the
/// pipeline is testable with any account. `displayed_balance` is the
/// caller's cached balance -- advisory only.
#[derive(Debug, Clone, Copy)]
pub struct AccountContext {
    pub account_id: AccountId,
    pub displayed_balance: i32,
}

/// One generation submission.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub style: String,
    /// Inline-encoded reference images (`data:` URLs), at most three.
    pub reference_images: Vec<String>,
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// An image reference: the temporary inline payload produced by the model,
/// or the durable URL that replaces it after a successful upload. An item
/// mutates Inline -> Durable exactly once; a failed upload leaves it Inline
/// permanently as a degraded-but-valid result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageRef {
    Inline { data_url: String },
    Durable { url: String },
}

impl ImageRef {
    /// The displayable URL regardless of durability.
    pub fn url(&self) -> &str {
        match self {
            ImageRef::Inline { data_url } => data_url,
            ImageRef::Durable { url } => url,
        }
    }

    pub fn is_durable(&self) -> bool {
        matches!(self, ImageRef::Durable { .. })
    }
}

/// One displayable artifact of a batch.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedItem {
    /// Original variation ordinal (0..N-1), preserved regardless of which
    /// calls completed first; used downstream for tie-breaking.
    pub index: u32,
    pub image: ImageRef,
    pub title: String,
    pub description: String,
}

/// Per-index outcome of the production loop. Failures are carried as data
/// instead of mutating a shared list mid-iteration.
#[derive(Debug)]
pub enum ProduceOutcome {
    Produced { index: u32, data_url: String },
    Failed { index: u32, reason: String },
}

// ---------------------------------------------------------------------------
// Batch outcome
// ---------------------------------------------------------------------------

/// Final outcome of a successful submission.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutcome {
    /// Displayable items ordered by variation index.
    pub items: Vec<GeneratedItem>,
    /// Optimistic/authoritative balance pair; `confirmed_balance` is set
    /// from the ledger's return value (or the local sandbox decrement).
    pub credit: CreditState,
    /// Items whose durable upload failed and kept their inline payload.
    pub degraded_uploads: u32,
}

/// Aborting submission failures.
///
/// Everything else (per-item generation failures, upload failures, metadata
/// failures, persistence failures) is absorbed with a documented fallback
/// and never surfaces here.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// Bad input; no externally visible side effect occurred.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Raised by the advisory pre-check (no items yet) or by authoritative
    /// settlement (the cached balance was stale). Already-produced items
    /// ride along rather than being discarded: the user keeps what they were
    /// shown, uncharged. That trade-off is deliberate and logged loudly --
    /// see DESIGN.md before changing it.
    #[error("Insufficient credits: {required} required, {balance} available")]
    InsufficientCredits {
        required: i32,
        balance: i32,
        items: Vec<GeneratedItem>,
    },

    /// The whole batch produced zero usable items. Nothing was charged or
    /// persisted.
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// The ledger could not be reached to settle the charge. Produced items
    /// are still returned; the charge did not happen.
    #[error("Credit settlement failed: {reason}")]
    Settlement {
        reason: String,
        items: Vec<GeneratedItem>,
    },
}
