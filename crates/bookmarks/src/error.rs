//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`. Every error response has the
//! body `{"kind": "...", "message": "..."}`; server-side failures are
//! captured to Sentry and their details hidden from the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::{ErrorKind, FolderError};

/// Application-level error type for the bookmarks API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Folder operation failed.
    #[error(transparent)]
    Folder(#[from] FolderError),

    /// Bearer token present but not valid.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Malformed path parameter or body.
    #[error("{0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    kind: ErrorKind,
    message: String,
}

impl AppError {
    /// The error's category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Folder(err) => err.kind(),
            Self::Unauthorized(_) => ErrorKind::Unauthenticated,
            Self::BadRequest(_) => ErrorKind::Validation,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// HTTP status for the error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();

        // Capture server errors to Sentry
        if kind == ErrorKind::Internal {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            _ if kind == ErrorKind::Internal => "Internal server error".to_string(),
            Self::Unauthorized(_) => "Invalid or expired token".to_string(),
            _ => self.to_string(),
        };

        (self.status(), Json(ErrorBody { kind, message })).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

impl From<inkshelf_core::IdError> for AppError {
    fn from(err: inkshelf_core::IdError) -> Self {
        Self::BadRequest(err.to_string())
    }
}
