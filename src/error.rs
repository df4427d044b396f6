//! Application error type and its HTTP mapping.
//!
//! Every failure that can reach a handler is one of five kinds:
//!
//! | Variant | Status | Meaning |
//! |---|---|---|
//! | [`AppError::Validation`] | 400 | malformed input, never reaches the store |
//! | [`AppError::NotFound`] | 404 | unknown short code |
//! | [`AppError::Conflict`] | 409 | short code uniqueness violation |
//! | [`AppError::Internal`] | 500 | store failure |
//! | [`AppError::Timeout`] | 500 | store operation exceeded its bound |
//!
//! Internal and timeout errors are rendered with generic details so driver
//! messages never leak to clients.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    #[error("{message}")]
    Conflict { message: String, details: Value },

    /// `retryable` is set only when the statement never reached the store.
    #[error("{message}")]
    Internal {
        message: String,
        details: Value,
        retryable: bool,
    },

    #[error("{operation} timed out")]
    Timeout { operation: &'static str },
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

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
            retryable: false,
        }
    }

    /// A store failure that happened before the statement was sent, so
    /// running it again cannot apply it twice.
    pub fn unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
            retryable: true,
        }
    }

    pub fn timeout(operation: &'static str) -> Self {
        Self::Timeout { operation }
    }

    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Internal { .. } | AppError::Timeout { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns true for failures caused by the store rather than the client.
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::Internal { .. } | AppError::Timeout { .. })
    }

    /// Returns true if the failed operation is known not to have been applied.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Internal { retryable: true, .. })
    }

    /// Converts the error into the client-facing payload.
    ///
    /// Timeouts are reported as plain internal errors.
    pub fn to_error_info(&self) -> ErrorInfo {
        match self {
            AppError::Validation { message, details } => ErrorInfo {
                code: "validation_error",
                message: message.clone(),
                details: details.clone(),
            },
            AppError::NotFound { message, details } => ErrorInfo {
                code: "not_found",
                message: message.clone(),
                details: details.clone(),
            },
            AppError::Conflict { message, details } => ErrorInfo {
                code: "conflict",
                message: message.clone(),
                details: details.clone(),
            },
            AppError::Internal { message, details, .. } => ErrorInfo {
                code: "internal_error",
                message: message.clone(),
                details: details.clone(),
            },
            AppError::Timeout { .. } => ErrorInfo {
                code: "internal_error",
                message: "Database error".to_string(),
                details: json!({}),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        map_sqlx_error(e)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = e.field_errors().keys().map(|k| k.to_string()).collect();
        fields.sort();
        AppError::bad_request("Request validation failed", json!({ "fields": fields }))
    }
}

/// Maps a driver error to an [`AppError`].
///
/// Unique violations (PostgreSQL `23505`, SQLite `SQLITE_CONSTRAINT_UNIQUE`)
/// become [`AppError::Conflict`]; anything else is logged and reported as a
/// generic internal error.
///
/// Only pool failures are marked retryable: no connection was obtained, so the
/// statement was never sent. I/O and protocol errors may arrive after a write
/// committed.
pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    if let Some(db) = e.as_database_error()
        && db.is_unique_violation()
    {
        return AppError::conflict(
            "Short code already exists",
            json!({ "constraint": db.constraint() }),
        );
    }

    tracing::error!(error = %e, "Database error");

    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            AppError::unavailable("Database error", json!({}))
        }
        _ => AppError::internal("Database error", json!({})),
    }
}
