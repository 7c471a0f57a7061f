use std::sync::Arc;

use viralthumb_genai::GenAiApi;
use viralthumb_pipeline::GenerationPipeline;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: viralthumb_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// The credit-gated generation pipeline with its live collaborators.
    pub pipeline: Arc<GenerationPipeline>,
    /// Generative API client, used directly by the enhancement and scoring
    /// handlers (which sit outside the batch pipeline).
    pub genai: Arc<GenAiApi>,
}
