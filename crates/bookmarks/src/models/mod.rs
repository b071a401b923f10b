//! Domain models for the bookmark subsystem.
//!
//! These types represent validated domain objects separate from stored
//! document bodies.

pub mod caller;
pub mod folder;

pub use caller::Caller;
pub use folder::{BookmarkFolder, FolderRecord, FolderUpdate};
