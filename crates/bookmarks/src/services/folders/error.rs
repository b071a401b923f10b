//! Bookmark folder error types.

use serde::Serialize;
use thiserror::Error;

use inkshelf_core::{FolderNameError, IdError};

use crate::store::StoreError;

/// Errors that can occur during bookmark folder operations.
#[derive(Debug, Error)]
pub enum FolderError {
    /// No signed-in caller.
    #[error("You must be signed in to manage bookmark folders")]
    Unauthenticated,

    /// The caller is signed in but is not the folder owner.
    #[error("Missing or insufficient permissions")]
    Forbidden,

    /// Invalid input (empty name, missing ID, ...).
    #[error("{0}")]
    Validation(String),

    /// The owner already has a folder with this name.
    #[error("A folder named \"{0}\" already exists")]
    Conflict(String),

    /// The folder does not exist (or is not visible to the caller).
    #[error("Folder not found")]
    NotFound,

    /// Store/database error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

/// Machine-readable error category, so callers can react differently
/// (prompt sign-in, show inline validation, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Unauthenticated,
    Forbidden,
    Validation,
    Conflict,
    NotFound,
    Internal,
}

impl FolderError {
    /// The error's category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthenticated => ErrorKind::Unauthenticated,
            Self::Forbidden => ErrorKind::Forbidden,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::NotFound => ErrorKind::NotFound,
            Self::Store(_) => ErrorKind::Internal,
        }
    }
}

impl From<IdError> for FolderError {
    fn from(err: IdError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<FolderNameError> for FolderError {
    fn from(err: FolderNameError) -> Self {
        Self::Validation(err.to_string())
    }
}
