//! Application error type mapping to HTTP status codes.
//!
//! Pre-stream failures become `{"detail": ...}` JSON bodies with the
//! matching status. Failures inside an open event stream never reach this
//! type -- headers are already sent, so they surface as in-stream error
//! frames instead.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use threadline_types::error::{AuthError, RepositoryError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Missing or malformed request fields, including uniqueness
    /// conflicts on registration.
    Validation(String),
    /// Missing/invalid token or failed credentials.
    Unauthorized(String),
    /// Unknown user or chat.
    NotFound(String),
    /// Anything unexpected.
    Internal(String),
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::MissingFields
            | AuthError::MissingCredentials
            | AuthError::UsernameTaken(_)
            | AuthError::EmailTaken(_) => AppError::Validation(e.to_string()),
            AuthError::UnknownEmail => AppError::NotFound(e.to_string()),
            AuthError::InvalidCredentials | AuthError::InvalidToken(_) => {
                AppError::Unauthorized(e.to_string())
            }
            AuthError::HashingFailed | AuthError::SigningFailed | AuthError::Storage(_) => {
                AppError::Internal(e.to_string())
            }
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => AppError::NotFound("chat not found".to_string()),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
