//! Error types for the shortening engine and its HTTP surface.
//!
//! - [`ShortenerError`] - returned by the engine and the ID allocator
//! - [`AppError`] - HTTP error envelope rendered by handlers

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::domain::repositories::StoreError;

/// Errors produced by the shortening engine.
#[derive(Debug, thiserror::Error)]
pub enum ShortenerError {
    /// The backing store could not complete an operation. Fatal to the
    /// current call; the engine never retries.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    /// The ID counter produced a value no valid counter can hold.
    #[error("ID counter holds an impossible value: {value}")]
    EncodingInvariant { value: i64 },

    /// A fresh counter kept moving while it was being seeded.
    #[error("ID counter could not be seeded after {attempts} attempts")]
    CounterContention { attempts: usize },
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// HTTP-facing application error.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    #[error("{message}")]
    ServiceUnavailable { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn service_unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    fn parts(self) -> (StatusCode, &'static str, String, Value) {
        match self {
            AppError::Validation { message, details } => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                message,
                details,
            ),
            AppError::NotFound { message, details } => {
                (StatusCode::NOT_FOUND, "not_found", message, details)
            }
            AppError::ServiceUnavailable { message, details } => (
                StatusCode::SERVICE_UNAVAILABLE,
                "store_unavailable",
                message,
                details,
            ),
            AppError::Internal { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                message,
                details,
            ),
        }
    }

    /// Returns the HTTP status this error renders with.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_error_info(self) -> ErrorInfo {
        let (_, code, message, details) = self.parts();
        ErrorInfo {
            code,
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = self.parts();

        let body = ErrorBody {
            error: ErrorInfo {
                code,
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ShortenerError> for AppError {
    fn from(err: ShortenerError) -> Self {
        match err {
            ShortenerError::StoreUnavailable(e) => {
                tracing::error!(error = %e, "Store unavailable");
                AppError::service_unavailable(
                    "Backing store is unavailable",
                    json!({ "reason": e.to_string() }),
                )
            }
            ShortenerError::EncodingInvariant { value } => {
                tracing::error!(value, "ID counter is corrupted");
                AppError::internal("ID counter is corrupted", json!({ "value": value }))
            }
            ShortenerError::CounterContention { attempts } => {
                tracing::error!(attempts, "ID counter seeding gave up");
                AppError::internal(
                    "Failed to allocate ID",
                    json!({ "reason": "Counter contention", "attempts": attempts }),
                )
            }
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).unwrap_or_else(|_| json!({}));
        AppError::bad_request("Request validation failed", details)
    }
}
