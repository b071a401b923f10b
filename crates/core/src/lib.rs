//! Inkshelf Core - Shared types library.
//!
//! This crate provides common types used across all Inkshelf components:
//! - `bookmarks` - Bookmark folder service, HTTP API and profile controller
//! - `cli` - Command-line tools for migrations and folder management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, folder names and works

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
