use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use viralthumb_core::error::CoreError;
use viralthumb_pipeline::SubmitError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`SubmitError`] for pipeline
/// failures, and adds HTTP-specific variants. Implements [`IntoResponse`]
/// to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `viralthumb_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An aborting failure from the generation pipeline.
    #[error(transparent)]
    Pipeline(#[from] SubmitError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    error_body("NOT_FOUND", format!("{entity} with id {id} not found")),
                ),
                CoreError::Validation(msg) => (
                    StatusCode::BAD_REQUEST,
                    error_body("VALIDATION_ERROR", msg.clone()),
                ),
                CoreError::Conflict(msg) => {
                    (StatusCode::CONFLICT, error_body("CONFLICT", msg.clone()))
                }
                CoreError::Unauthorized(msg) => (
                    StatusCode::UNAUTHORIZED,
                    error_body("UNAUTHORIZED", msg.clone()),
                ),
                CoreError::Forbidden(msg) => {
                    (StatusCode::FORBIDDEN, error_body("FORBIDDEN", msg.clone()))
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        error_body("INTERNAL_ERROR", "An internal error occurred".to_string()),
                    )
                }
            },

            // --- Pipeline failures ---
            AppError::Pipeline(submit) => pipeline_response(submit),

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                error_body("BAD_REQUEST", msg.clone()),
            ),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    error_body("INTERNAL_ERROR", "An internal error occurred".to_string()),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Standard `{ "error": ..., "code": ... }` error payload.
fn error_body(code: &'static str, message: String) -> serde_json::Value {
    json!({
        "error": message,
        "code": code,
    })
}

/// Map an aborting pipeline failure to a status and payload.
///
/// The insufficient-credits and settlement payloads carry any
/// already-produced items: the client shows the user what they have while
/// presenting the upgrade/error path, instead of silently dropping
/// rendered images.
fn pipeline_response(submit: &SubmitError) -> (StatusCode, serde_json::Value) {
    match submit {
        SubmitError::InvalidRequest(msg) => (
            StatusCode::BAD_REQUEST,
            error_body("VALIDATION_ERROR", msg.clone()),
        ),
        SubmitError::InsufficientCredits {
            required,
            balance,
            items,
        } => (
            StatusCode::PAYMENT_REQUIRED,
            json!({
                "error": submit.to_string(),
                "code": "INSUFFICIENT_CREDITS",
                "required": required,
                "balance": balance,
                "upgrade": true,
                "items": items,
            }),
        ),
        SubmitError::GenerationFailed(msg) => (
            StatusCode::BAD_GATEWAY,
            error_body("GENERATION_FAILED", msg.clone()),
        ),
        SubmitError::Settlement { reason, items } => (
            StatusCode::BAD_GATEWAY,
            json!({
                "error": format!("Credit settlement failed: {reason}"),
                "code": "SETTLEMENT_FAILED",
                "items": items,
            }),
        ),
    }
}

/// Classify a sqlx error into an HTTP status and payload.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, serde_json::Value) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            error_body("NOT_FOUND", "Resource not found".to_string()),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        error_body(
                            "CONFLICT",
                            format!("Duplicate value violates unique constraint: {constraint}"),
                        ),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body("INTERNAL_ERROR", "An internal error occurred".to_string()),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body("INTERNAL_ERROR", "An internal error occurred".to_string()),
            )
        }
    }
}
