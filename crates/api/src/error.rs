use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use devices_core::error::CoreError;
use devices_core::validation::validator::ValidationError;
use serde_json::json;

/// Plain-text body returned when the rule catalog cannot be used.
pub const CONFIGURATION_FAILURE_MESSAGE: &str = "Validation configuration could not be loaded";

/// Application-level error type for HTTP handlers and middleware.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `devices_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Device attributes violated the rule group for its type.
    #[error("Device validation failed: {}", .0.join("; "))]
    ValidationFailed(Vec<String>),

    /// The rule catalog could not be loaded.
    #[error("Validation configuration error: {0}")]
    Configuration(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::Configuration(e) => AppError::Configuration(e.to_string()),
            ValidationError::Lookup(e) => {
                AppError::InternalError(format!("device type lookup failed: {e}"))
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- Device validation outcomes ---
            AppError::ValidationFailed(violations) => {
                return (
                    StatusCode::BAD_REQUEST,
                    axum::Json(json!({ "errors": violations })),
                )
                    .into_response();
            }
            AppError::Configuration(msg) => {
                tracing::error!(error = %msg, "Validation configuration could not be loaded");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    CONFIGURATION_FAILURE_MESSAGE,
                )
                    .into_response();
            }

            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
