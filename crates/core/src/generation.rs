//! Generation batch constants, submission guards, displayable-URL rules,
//! and templated metadata fallbacks.
//!
//! The async pipeline itself lives in `viralthumb-pipeline`; everything here
//! is pure so the guard and fallback behavior can be tested without any
//! collaborator in the loop.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Batch constants
// ---------------------------------------------------------------------------

/// Number of variations requested per generation batch.
pub const VARIATION_COUNT: u32 = 3;

/// Credits charged per produced variation.
pub const CREDITS_PER_VARIATION: i32 = 1;

/// Maximum number of reference images accepted per submission.
pub const MAX_REFERENCE_IMAGES: usize = 3;

/// Seconds allowed for text-model calls (metadata, scoring, enhancement)
/// before the caller proceeds with fallback data.
pub const TEXT_MODEL_TIMEOUT_SECS: u64 = 5;

/// Full advisory cost of a batch of `variation_count` variations.
pub fn batch_cost(variation_count: u32) -> i32 {
    variation_count as i32 * CREDITS_PER_VARIATION
}

// ---------------------------------------------------------------------------
// Submission guards
// ---------------------------------------------------------------------------

/// Validate a submission before any external call is made.
///
/// - The prompt must be non-empty after trimming.
/// - At most [`MAX_REFERENCE_IMAGES`] reference images are accepted.
pub fn validate_submission(prompt: &str, reference_image_count: usize) -> Result<(), CoreError> {
    if prompt.trim().is_empty() {
        return Err(CoreError::Validation("Prompt must not be empty".to_string()));
    }
    if reference_image_count > MAX_REFERENCE_IMAGES {
        return Err(CoreError::Validation(format!(
            "At most {MAX_REFERENCE_IMAGES} reference images are allowed, got {reference_image_count}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Displayable-URL classification
// ---------------------------------------------------------------------------

const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".webp"];

/// Whether a result item's payload is recognizable as image data.
///
/// Accepts inline-encoded images (`data:image/...`), durable object-store
/// URLs (`.../storage/v1/object/public/...`), and plain paths ending in a
/// known image extension. Anything else is excluded from rendering without
/// failing the batch.
pub fn is_displayable_url(url: &str) -> bool {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return false;
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("data:image/") {
        return true;
    }
    if lower.contains("storage/v1/object/public/") {
        return true;
    }
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

// ---------------------------------------------------------------------------
// Metadata fallbacks
// ---------------------------------------------------------------------------

/// Adjective rotation used by the templated fallback titles.
pub const FALLBACK_ADJECTIVES: &[&str] =
    &["SHOCKING", "INSANE", "UNBELIEVABLE", "GENIUS", "SECRET"];

/// Concept used when the prompt itself is blank (defensive; guarded
/// submissions never reach this).
const FALLBACK_CONCEPT: &str = "This Changes Everything";

/// Templated title for the item at `position` within the batch:
/// `"<ADJ>: <prompt> (<position + 1> Mind-Blowing Tips)"`.
pub fn fallback_title(prompt: &str, position: usize) -> String {
    let concept = match prompt.trim() {
        "" => FALLBACK_CONCEPT,
        trimmed => trimmed,
    };
    let adjective = FALLBACK_ADJECTIVES[position % FALLBACK_ADJECTIVES.len()];
    format!("{adjective}: {concept} ({} Mind-Blowing Tips)", position + 1)
}

/// Templated description derived from an item's title.
pub fn fallback_description(title: &str) -> String {
    format!(
        "{title}\n\nSmash LIKE if this surprised you and SUBSCRIBE for more! \
         Comment your favorite part. Turn on notifications to never miss out."
    )
}

/// Whether a suggested title looks like the text model's own placeholder
/// output (`"Viral A"`, `"viral b"`, ...). Such titles are rejected in favor
/// of the template.
pub fn is_placeholder_title(title: &str) -> bool {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    let pattern = PLACEHOLDER
        .get_or_init(|| Regex::new(r"(?i)viral\s[a-z]").expect("placeholder title regex"));
    pattern.is_match(title)
}

/// Pick the title for the item at `position`: the suggestion when it is
/// present, non-empty, and not a placeholder; the template otherwise.
pub fn resolve_title(suggested: Option<&str>, prompt: &str, position: usize) -> String {
    match suggested {
        Some(title) if !title.trim().is_empty() && !is_placeholder_title(title) => {
            title.trim().to_string()
        }
        _ => fallback_title(prompt, position),
    }
}

// ---------------------------------------------------------------------------
// Credit state
// ---------------------------------------------------------------------------

/// The optimistic/authoritative split for an account's credit balance.
///
/// `displayed_balance` is a UI-owned hint that may be stale.
/// `confirmed_balance` is only ever set from the value returned by the
/// relational store's atomic decrement; the moment it is known, the
/// displayed value snaps to it. The two are never collapsed into one
/// mutable field, so a stale hint can never overwrite a confirmed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CreditState {
    pub displayed_balance: i32,
    pub confirmed_balance: Option<i32>,
}

impl CreditState {
    /// A provisional state holding only the cached hint.
    pub fn optimistic(displayed_balance: i32) -> Self {
        Self {
            displayed_balance,
            confirmed_balance: None,
        }
    }

    /// Record the authoritative balance. The displayed value is overwritten
    /// with the server-returned figure, never computed by local subtraction.
    pub fn confirm(&mut self, authoritative: i32) {
        self.displayed_balance = authoritative;
        self.confirmed_balance = Some(authoritative);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
