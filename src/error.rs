use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

impl From<serde_json::Error> for AttestorError {
    fn from(err: serde_json::Error) -> Self {
        Self::ValidationError(format!("JSON serialization error: {}", err))
    }
}

impl From<sqlx::Error> for AttestorError {
    fn from(err: sqlx::Error) -> Self {
        Self::StorageError(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum AttestorError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Cryptographic error: {0}")]
    CryptoError(String),

    #[error("{0}")]
    BadRequestError(String),

    #[error("{0}")]
    NotFoundError(String),

    #[error("{0}")]
    UnauthorizedError(String),

    #[error("{0}")]
    ForbiddenError(String),

    #[error("Invalid verification token")]
    InvalidTokenError,

    #[error("Verification token has been exhausted (usage limit exceeded)")]
    TokenExhaustedError { usage_count: i64, usage_limit: i64 },
}

/// Maps each error class onto the HTTP surface. Internal classes are logged
/// server-side and collapse to a generic 500 body so storage and crypto
/// details never leak to callers.
impl IntoResponse for AttestorError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::BadRequestError(msg) => (StatusCode::BAD_REQUEST, json!({ "message": msg })),
            Self::UnauthorizedError(msg) => (StatusCode::UNAUTHORIZED, json!({ "message": msg })),
            Self::InvalidTokenError => {
                (StatusCode::UNAUTHORIZED, json!({ "message": self.to_string() }))
            }
            Self::TokenExhaustedError {
                usage_count,
                usage_limit,
            } => (
                StatusCode::UNAUTHORIZED,
                json!({
                    "message": self.to_string(),
                    "exhausted": true,
                    "usageCount": usage_count,
                    "usageLimit": usage_limit,
                }),
            ),
            Self::ForbiddenError(msg) => (StatusCode::FORBIDDEN, json!({ "message": msg })),
            Self::NotFoundError(msg) => (StatusCode::NOT_FOUND, json!({ "message": msg })),
            Self::ConfigError(_)
            | Self::StorageError(_)
            | Self::ValidationError(_)
            | Self::CryptoError(_) => {
                error!("Request failed: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "Server error" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
