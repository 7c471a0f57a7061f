/// Domain-level error type shared across all crates.
///
/// The `id` in [`CoreError::NotFound`] is a string so that both UUID-keyed
/// entities (profiles) and BIGSERIAL-keyed entities (generations, templates)
/// fit the same variant.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
