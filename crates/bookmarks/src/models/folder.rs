//! Bookmark folder domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use inkshelf_core::{FolderId, FolderName, WorkId};

use crate::store::{Document, StoreError};

/// A user's bookmark folder.
///
/// `id` always comes from the document key, never from the stored body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkFolder {
    /// Store-assigned folder ID.
    pub id: FolderId,
    /// Display name, unique among the owner's folders.
    pub name: FolderName,
    /// Whether other users may see this folder.
    pub is_public: bool,
    /// Work IDs in display order, without duplicates.
    #[serde(default)]
    pub works: Vec<WorkId>,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl BookmarkFolder {
    /// Build a folder from a stored document.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DataCorruption` if the document is not a valid folder.
    pub fn from_document(document: Document) -> Result<Self, StoreError> {
        let Document { id, mut fields } = document;
        fields.insert("id".to_owned(), Value::String(id.clone()));

        serde_json::from_value(Value::Object(fields)).map_err(|e| {
            StoreError::DataCorruption(format!("invalid bookmark folder {id}: {e}"))
        })
    }

    /// Whether the folder already holds `work_id`.
    #[must_use]
    pub fn contains(&self, work_id: &WorkId) -> bool {
        self.works.contains(work_id)
    }
}

/// Stored body of a bookmark folder (everything except the ID).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderRecord<'a> {
    pub name: &'a FolderName,
    pub is_public: bool,
    pub works: &'a [WorkId],
    pub created_at: DateTime<Utc>,
}

/// Partial update of a folder's name and/or visibility.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderUpdate {
    /// New name (validated by the service).
    #[serde(default)]
    pub name: Option<String>,
    /// New visibility.
    #[serde(default)]
    pub is_public: Option<bool>,
}

impl FolderUpdate {
    /// An update that only renames.
    #[must_use]
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            is_public: None,
        }
    }

    /// An update that only changes visibility.
    #[must_use]
    pub const fn visibility(is_public: bool) -> Self {
        Self {
            name: None,
            is_public: Some(is_public),
        }
    }
}
