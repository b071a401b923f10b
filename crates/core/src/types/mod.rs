//! Core types for Inkshelf.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod folder_name;
pub mod id;
pub mod work;

pub use folder_name::{FolderName, FolderNameError};
pub use id::*;
pub use work::{Work, WorkKind, WorkStatus};
