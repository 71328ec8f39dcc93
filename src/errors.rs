//! Centralized error handling.
//!
//! Provides a unified error type for the entire application,
//! with automatic HTTP response conversion.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use thiserror::Error;

use crate::config::{MSG_DATABASE_FAILED, MSG_EMAIL_EXISTS, MSG_USERNAME_EXISTS};

/// Application error types.
///
/// Each variant is a stable failure kind callers can match on.
#[derive(Error, Debug)]
pub enum AppError {
    // Uniqueness
    #[error("Username already exists")]
    DuplicateUsername,

    #[error("Email already exists")]
    DuplicateEmail,

    // Input
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Validation(String),

    // Storage
    #[error("Storage failure: {0}")]
    Storage(#[from] DbErr),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::DuplicateUsername => "DUPLICATE_USERNAME",
            AppError::DuplicateEmail => "DUPLICATE_EMAIL",
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Storage(_) => "STORAGE_FAILURE",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::DuplicateUsername | AppError::DuplicateEmail => StatusCode::CONFLICT,
            AppError::InvalidInput(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Storage(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            AppError::DuplicateUsername => MSG_USERNAME_EXISTS.to_string(),
            AppError::DuplicateEmail => MSG_EMAIL_EXISTS.to_string(),
            AppError::InvalidInput(msg) | AppError::Validation(msg) => msg.clone(),

            // Hide details for internal errors
            AppError::Storage(e) => {
                tracing::error!("Storage error: {:?}", e);
                MSG_DATABASE_FAILED.to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
        }
    }

    /// Whether this failure is one of the uniqueness kinds.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, AppError::DuplicateUsername | AppError::DuplicateEmail)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.user_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors
impl AppError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        AppError::InvalidInput(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

/// Translate a failed write into the failure taxonomy.
///
/// Unique violations on the username or email index become the same
/// duplicate kinds the pre-checks report. Everything else is a storage
/// failure.
pub fn translate_write_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            duplicate_from_violation(&detail).unwrap_or(AppError::Storage(err))
        }
        _ => AppError::Storage(err),
    }
}

/// Attribute a unique-violation message to the column it names.
///
/// Postgres reports the violated index (`idx_users_email`), SQLite the
/// column (`users.email`); both contain the column name.
pub fn duplicate_from_violation(detail: &str) -> Option<AppError> {
    let detail = detail.to_ascii_lowercase();
    if detail.contains("username") {
        Some(AppError::DuplicateUsername)
    } else if detail.contains("email") {
        Some(AppError::DuplicateEmail)
    } else {
        None
    }
}
