//! Business logic services.

pub mod folders;
pub mod tokens;
pub mod works;

pub use folders::{ErrorKind, FolderError, FolderService};
pub use tokens::{Hs256Verifier, TokenError, TokenVerifier};
pub use works::WorkCatalog;
