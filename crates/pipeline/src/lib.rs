//! The credit-gated generation pipeline.
//!
//! [`GenerationPipeline`] drives one submission through its named stages --
//! validate, produce, upload, annotate, settle, persist -- against five
//! narrow collaborator contracts, enforcing the failure-isolation and
//! credit-reconciliation rules structurally rather than with scattered
//! try/catch. The orchestrator owns no durable state: the relational
//! store's atomic decrement is the only authority on credits, and every
//! locally held balance is a hint.

pub mod contracts;
pub mod orchestrator;
pub mod outcome;

pub use contracts::{
    ArchiveError, CreditLedger, GenerateError, GenerationArchive, ImageGenerator, LedgerError,
    MetadataError, MetadataGenerator, MetadataSuggestion, NewGenerationRecord, ObjectStore,
    StoreError,
};
pub use orchestrator::{GenerationPipeline, PipelineConfig};
pub use outcome::{
    AccountContext, GeneratedItem, GenerationOutcome, GenerationRequest, ImageRef, SubmitError,
};
