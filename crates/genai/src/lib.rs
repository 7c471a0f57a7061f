//! REST client for the hosted generative image/text API.
//!
//! Provides image variation generation, structured title/description
//! suggestion, CTR scoring, and prompt enhancement. Prompt composition
//! lives in [`prompts`]; all transport concerns live in [`api`].

pub mod api;
pub mod prompts;

pub use api::{CtrAnalysis, GenAiApi, GenAiApiError, MetadataSuggestion};
