//! Hierarchical document store.
//!
//! Documents live in collections addressed by path segments, e.g.
//! `users/{userId}/bookmarkFolders`. Each document is a JSON object keyed by
//! a store-assigned ID. The ID is never part of the document body.
//!
//! # Backends
//!
//! - [`MemoryStore`] - process-local, used by tests and when no database is
//!   configured
//! - [`PostgresStore`] - `PostgreSQL` table with one JSONB row per document
//!
//! # Migrations
//!
//! The `PostgreSQL` schema lives in `crates/bookmarks/migrations/` and is applied via:
//! ```bash
//! cargo run -p inkshelf-cli -- migrate
//! ```

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use inkshelf_core::UserId;

pub use memory::MemoryStore;
pub use postgres::{PostgresStore, create_pool};

/// Fields of a stored document.
pub type Fields = Map<String, Value>;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the store is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested document was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate document ID).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Path of a collection, e.g. `users/u1/bookmarkFolders`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionPath(String);

impl CollectionPath {
    /// Name of the per-user bookmark folder subcollection.
    pub const BOOKMARK_FOLDERS: &'static str = "bookmarkFolders";

    /// Top-level collection of users.
    pub const USERS: &'static str = "users";

    /// Top-level collection of published works.
    pub const WORKS: &'static str = "works";

    /// A top-level collection.
    #[must_use]
    pub fn root(name: &str) -> Self {
        Self(name.to_owned())
    }

    /// A subcollection below a document of this collection.
    #[must_use]
    pub fn child(&self, document_id: &str, name: &str) -> Self {
        Self(format!("{}/{document_id}/{name}", self.0))
    }

    /// `users/{owner}/bookmarkFolders`.
    #[must_use]
    pub fn bookmark_folders(owner: &UserId) -> Self {
        Self::root(Self::USERS).child(owner.as_str(), Self::BOOKMARK_FOLDERS)
    }

    /// `works`.
    #[must_use]
    pub fn works() -> Self {
        Self::root(Self::WORKS)
    }

    /// Full path of a document in this collection.
    #[must_use]
    pub fn document_path(&self, id: &str) -> String {
        format!("{}/{id}", self.0)
    }

    /// The path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored document: its key plus its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Store-assigned document key.
    pub id: String,
    /// Document body.
    pub fields: Fields,
}

/// A single change applied by [`DocumentStore::update`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    /// Overwrite a field.
    Set(String, Value),
    /// Append values to an array field, skipping values already present.
    ArrayUnion(String, Vec<Value>),
    /// Remove every occurrence of the values from an array field.
    ArrayRemove(String, Vec<Value>),
}

impl FieldUpdate {
    /// Overwrite `field` with `value`.
    pub fn set(field: &str, value: impl Into<Value>) -> Self {
        Self::Set(field.to_owned(), value.into())
    }

    /// Add `value` to the array `field` unless already present.
    pub fn array_union(field: &str, value: impl Into<Value>) -> Self {
        Self::ArrayUnion(field.to_owned(), vec![value.into()])
    }

    /// Remove `value` from the array `field`.
    pub fn array_remove(field: &str, value: impl Into<Value>) -> Self {
        Self::ArrayRemove(field.to_owned(), vec![value.into()])
    }
}

/// Operations every store backend provides.
///
/// Backends must apply all [`FieldUpdate`]s of one `update` call atomically
/// with respect to other writers of the same document.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Get a document by ID.
    async fn get(
        &self,
        collection: &CollectionPath,
        id: &str,
    ) -> Result<Option<Document>, StoreError>;

    /// Get every document of a collection, oldest first.
    async fn list(&self, collection: &CollectionPath) -> Result<Vec<Document>, StoreError>;

    /// Get up to `limit` documents whose `field` equals `value`, oldest first.
    async fn find_by_field(
        &self,
        collection: &CollectionPath,
        field: &str,
        value: &Value,
        limit: usize,
    ) -> Result<Vec<Document>, StoreError>;

    /// Create a document with a generated ID.
    async fn create(
        &self,
        collection: &CollectionPath,
        fields: Fields,
    ) -> Result<Document, StoreError>;

    /// Replace (or create) the document with the given ID.
    async fn replace(
        &self,
        collection: &CollectionPath,
        id: &str,
        fields: Fields,
    ) -> Result<(), StoreError>;

    /// Apply field updates to an existing document and return the result.
    ///
    /// Returns `StoreError::NotFound` if the document does not exist.
    async fn update(
        &self,
        collection: &CollectionPath,
        id: &str,
        updates: &[FieldUpdate],
    ) -> Result<Document, StoreError>;

    /// Delete a document. Returns `true` if it existed.
    async fn delete(&self, collection: &CollectionPath, id: &str) -> Result<bool, StoreError>;

    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Serialize a record into document fields.
///
/// # Errors
///
/// Returns `StoreError::DataCorruption` if the value does not serialize to a JSON object.
pub fn to_fields<T: Serialize>(record: &T) -> Result<Fields, StoreError> {
    match serde_json::to_value(record) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(other) => Err(StoreError::DataCorruption(format!(
            "document body must be an object, got {other}"
        ))),
        Err(e) => Err(StoreError::DataCorruption(format!(
            "failed to serialize document: {e}"
        ))),
    }
}

/// Apply field updates to a document body in place.
///
/// Shared by all backends so that array semantics are identical.
///
/// # Errors
///
/// Returns `StoreError::DataCorruption` if an array transform targets a
/// field that exists but is not an array.
pub fn apply_updates(fields: &mut Fields, updates: &[FieldUpdate]) -> Result<(), StoreError> {
    for update in updates {
        match update {
            FieldUpdate::Set(field, value) => {
                fields.insert(field.clone(), value.clone());
            }
            FieldUpdate::ArrayUnion(field, values) => {
                let array = array_field(fields, field)?;
                for value in values {
                    if !array.contains(value) {
                        array.push(value.clone());
                    }
                }
            }
            FieldUpdate::ArrayRemove(field, values) => {
                let array = array_field(fields, field)?;
                array.retain(|existing| !values.contains(existing));
            }
        }
    }
    Ok(())
}

/// Get a mutable array field, creating it if missing.
fn array_field<'a>(fields: &'a mut Fields, field: &str) -> Result<&'a mut Vec<Value>, StoreError> {
    let slot = fields
        .entry(field.to_owned())
        .or_insert_with(|| Value::Array(Vec::new()));

    match slot {
        Value::Array(array) => Ok(array),
        other => Err(StoreError::DataCorruption(format!(
            "field `{field}` is not an array: {other}"
        ))),
    }
}
