//! Bookmark folder service.
//!
//! Owns every read and write of `users/{owner}/bookmarkFolders`. This is the
//! only sanctioned mutation path: the store itself does not check ownership,
//! so each mutating operation first requires a signed-in caller and then
//! requires that caller to be the folder owner.
//!
//! # Consistency
//!
//! Work membership changes go through the store's array-union/array-remove
//! transforms, which backends apply atomically per document, so concurrent
//! `add_work`/`remove_work` calls on one folder never lose updates.
//!
//! Name uniqueness is checked with a lookup before the write. Two concurrent
//! creates with the same name can both pass the check; the guard is
//! best-effort only.

mod error;

pub use error::{ErrorKind, FolderError};

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info, warn};

use inkshelf_core::{FolderId, FolderName, UserId, WorkId};

use crate::models::{BookmarkFolder, Caller, FolderRecord, FolderUpdate};
use crate::store::{CollectionPath, DocumentStore, FieldUpdate, StoreError, to_fields};

const FIELD_NAME: &str = "name";
const FIELD_IS_PUBLIC: &str = "isPublic";
const FIELD_WORKS: &str = "works";
const FIELD_UPDATED_AT: &str = "updatedAt";

/// Bookmark folder service.
///
/// Cheap to clone; all clones share the same store.
#[derive(Clone)]
pub struct FolderService {
    store: Arc<dyn DocumentStore>,
}

impl std::fmt::Debug for FolderService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FolderService").finish_non_exhaustive()
    }
}

impl FolderService {
    /// Create a new folder service over a document store.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// List all folders owned by `owner`, oldest first.
    ///
    /// No authorization: filtering private folders for other viewers is
    /// done by [`Self::list_visible`].
    ///
    /// # Errors
    ///
    /// Returns `FolderError::Store` if the store fails or holds invalid data.
    #[tracing::instrument(skip(self), fields(owner = %owner))]
    pub async fn list(&self, owner: &UserId) -> Result<Vec<BookmarkFolder>, FolderError> {
        let collection = CollectionPath::bookmark_folders(owner);
        let documents = self.store.list(&collection).await?;

        let mut folders = documents
            .into_iter()
            .map(BookmarkFolder::from_document)
            .collect::<Result<Vec<_>, _>>()?;
        // Stable: equal timestamps keep the store's order
        folders.sort_by_key(|f| f.created_at);

        Ok(folders)
    }

    /// List the folders of `owner` that `caller` may see.
    ///
    /// The owner sees every folder; everyone else only public ones.
    ///
    /// # Errors
    ///
    /// Returns `FolderError::Store` if the store fails or holds invalid data.
    pub async fn list_visible(
        &self,
        caller: &Caller,
        owner: &UserId,
    ) -> Result<Vec<BookmarkFolder>, FolderError> {
        let folders = self.list(owner).await?;
        if caller.is(owner) {
            return Ok(folders);
        }

        Ok(folders.into_iter().filter(|f| f.is_public).collect())
    }

    /// Get one folder of `owner`.
    ///
    /// Private folders are reported as missing to anyone but the owner.
    ///
    /// # Errors
    ///
    /// Returns `FolderError::NotFound` if the folder does not exist or is not visible.
    /// Returns `FolderError::Store` if the store fails.
    pub async fn get(
        &self,
        caller: &Caller,
        owner: &UserId,
        folder_id: &FolderId,
    ) -> Result<BookmarkFolder, FolderError> {
        let collection = CollectionPath::bookmark_folders(owner);
        let folder = self
            .load(&collection, folder_id)
            .await?
            .ok_or(FolderError::NotFound)?;

        if folder.is_public || caller.is(owner) {
            Ok(folder)
        } else {
            Err(FolderError::NotFound)
        }
    }

    // =========================================================================
    // Folder lifecycle
    // =========================================================================

    /// Create a folder for `owner`.
    ///
    /// # Errors
    ///
    /// Returns `FolderError::Unauthenticated` if the caller is not signed in.
    /// Returns `FolderError::Forbidden` if the caller is not `owner`.
    /// Returns `FolderError::Validation` if the name is empty or too long.
    /// Returns `FolderError::Conflict` if `owner` already has a folder with this name.
    #[tracing::instrument(skip(self, caller), fields(owner = %owner))]
    pub async fn create(
        &self,
        caller: &Caller,
        owner: &UserId,
        name: &str,
        is_public: bool,
    ) -> Result<BookmarkFolder, FolderError> {
        authorize(caller, owner, "create")?;
        let name = FolderName::parse(name)?;
        let collection = CollectionPath::bookmark_folders(owner);

        if self.name_taken(&collection, &name, None).await? {
            debug!(name = %name, "folder name already in use");
            return Err(FolderError::Conflict(name.into_inner()));
        }

        let record = FolderRecord {
            name: &name,
            is_public,
            works: &[],
            created_at: Utc::now(),
        };
        let document = self.store.create(&collection, to_fields(&record)?).await?;
        let folder = BookmarkFolder::from_document(document)?;

        info!(folder_id = %folder.id, name = %folder.name, is_public, "bookmark folder created");
        Ok(folder)
    }

    /// Rename a folder and/or change its visibility.
    ///
    /// # Errors
    ///
    /// Returns `FolderError::Unauthenticated` / `FolderError::Forbidden` on failed authorization.
    /// Returns `FolderError::Validation` if a new name is empty or too long.
    /// Returns `FolderError::NotFound` if the folder does not exist.
    /// Returns `FolderError::Conflict` if another folder of `owner` already has the new name.
    #[tracing::instrument(skip(self, caller, updates), fields(owner = %owner, folder_id = %folder_id))]
    pub async fn update(
        &self,
        caller: &Caller,
        owner: &UserId,
        folder_id: &FolderId,
        updates: FolderUpdate,
    ) -> Result<BookmarkFolder, FolderError> {
        authorize(caller, owner, "update")?;
        let name = updates
            .name
            .as_deref()
            .map(FolderName::parse)
            .transpose()?;
        let collection = CollectionPath::bookmark_folders(owner);

        let folder = self
            .load(&collection, folder_id)
            .await?
            .ok_or(FolderError::NotFound)?;

        let mut changes = Vec::new();

        if let Some(name) = name
            && name != folder.name
        {
            if self.name_taken(&collection, &name, Some(folder_id)).await? {
                return Err(FolderError::Conflict(name.into_inner()));
            }
            changes.push(FieldUpdate::set(FIELD_NAME, name.into_inner()));
        }

        if let Some(is_public) = updates.is_public
            && is_public != folder.is_public
        {
            changes.push(FieldUpdate::set(FIELD_IS_PUBLIC, is_public));
        }

        if changes.is_empty() {
            debug!("folder update changes nothing");
            return Ok(folder);
        }

        changes.push(updated_now());
        let folder = self.apply(&collection, folder_id, &changes).await?;

        info!("bookmark folder updated");
        Ok(folder)
    }

    /// Delete a folder.
    ///
    /// Deleting a folder that does not exist succeeds. Callers holding the
    /// folder as their current selection must clear it.
    ///
    /// # Errors
    ///
    /// Returns `FolderError::Unauthenticated` / `FolderError::Forbidden` on failed authorization.
    /// Returns `FolderError::Store` if the store fails.
    #[tracing::instrument(skip(self, caller), fields(owner = %owner, folder_id = %folder_id))]
    pub async fn delete(
        &self,
        caller: &Caller,
        owner: &UserId,
        folder_id: &FolderId,
    ) -> Result<(), FolderError> {
        authorize(caller, owner, "delete")?;
        let collection = CollectionPath::bookmark_folders(owner);

        if self.store.delete(&collection, folder_id.as_str()).await? {
            info!("bookmark folder deleted");
        } else {
            debug!("bookmark folder already absent");
        }

        Ok(())
    }

    // =========================================================================
    // Work membership
    // =========================================================================

    /// Append a work to a folder.
    ///
    /// Adding a work that is already in the folder is a no-op and leaves
    /// `updatedAt` unchanged.
    ///
    /// # Errors
    ///
    /// Returns `FolderError::Unauthenticated` / `FolderError::Forbidden` on failed authorization.
    /// Returns `FolderError::NotFound` if the folder does not exist.
    #[tracing::instrument(skip(self, caller), fields(owner = %owner, folder_id = %folder_id, work_id = %work_id))]
    pub async fn add_work(
        &self,
        caller: &Caller,
        owner: &UserId,
        folder_id: &FolderId,
        work_id: &WorkId,
    ) -> Result<BookmarkFolder, FolderError> {
        authorize(caller, owner, "add_work")?;
        let collection = CollectionPath::bookmark_folders(owner);

        let folder = self
            .load(&collection, folder_id)
            .await?
            .ok_or(FolderError::NotFound)?;

        if folder.contains(work_id) {
            debug!("work already in folder");
            return Ok(folder);
        }

        let folder = self
            .apply(
                &collection,
                folder_id,
                &[
                    FieldUpdate::array_union(FIELD_WORKS, work_id.as_str()),
                    updated_now(),
                ],
            )
            .await?;

        info!(works = folder.works.len(), "work added to folder");
        Ok(folder)
    }

    /// Remove a work from a folder.
    ///
    /// Removing a work that is not in the folder succeeds.
    ///
    /// # Errors
    ///
    /// Returns `FolderError::Unauthenticated` / `FolderError::Forbidden` on failed authorization.
    /// Returns `FolderError::NotFound` if the folder does not exist.
    #[tracing::instrument(skip(self, caller), fields(owner = %owner, folder_id = %folder_id, work_id = %work_id))]
    pub async fn remove_work(
        &self,
        caller: &Caller,
        owner: &UserId,
        folder_id: &FolderId,
        work_id: &WorkId,
    ) -> Result<BookmarkFolder, FolderError> {
        authorize(caller, owner, "remove_work")?;
        let collection = CollectionPath::bookmark_folders(owner);

        let folder = self
            .apply(
                &collection,
                folder_id,
                &[
                    FieldUpdate::array_remove(FIELD_WORKS, work_id.as_str()),
                    updated_now(),
                ],
            )
            .await?;

        info!(works = folder.works.len(), "work removed from folder");
        Ok(folder)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn load(
        &self,
        collection: &CollectionPath,
        folder_id: &FolderId,
    ) -> Result<Option<BookmarkFolder>, FolderError> {
        let document = self.store.get(collection, folder_id.as_str()).await?;
        Ok(document.map(BookmarkFolder::from_document).transpose()?)
    }

    /// Apply updates to an existing folder, mapping a vanished document to `NotFound`.
    async fn apply(
        &self,
        collection: &CollectionPath,
        folder_id: &FolderId,
        updates: &[FieldUpdate],
    ) -> Result<BookmarkFolder, FolderError> {
        let document = self
            .store
            .update(collection, folder_id.as_str(), updates)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => FolderError::NotFound,
                other => FolderError::Store(other),
            })?;

        Ok(BookmarkFolder::from_document(document)?)
    }

    /// Whether a folder other than `except` already uses `name`.
    async fn name_taken(
        &self,
        collection: &CollectionPath,
        name: &FolderName,
        except: Option<&FolderId>,
    ) -> Result<bool, FolderError> {
        let matches = self
            .store
            .find_by_field(collection, FIELD_NAME, &Value::from(name.as_str()), 2)
            .await?;

        Ok(matches
            .iter()
            .any(|doc| except.is_none_or(|id| doc.id != id.as_str())))
    }
}

/// Require a signed-in caller who owns the folders being changed.
fn authorize<'c>(
    caller: &'c Caller,
    owner: &UserId,
    operation: &'static str,
) -> Result<&'c UserId, FolderError> {
    let Some(user_id) = caller.user_id() else {
        warn!(owner = %owner, operation, "rejected folder operation without signed-in user");
        return Err(FolderError::Unauthenticated);
    };

    if user_id != owner {
        warn!(
            owner = %owner,
            caller = %user_id,
            operation,
            "rejected folder operation on another user's folders"
        );
        return Err(FolderError::Forbidden);
    }

    Ok(user_id)
}

fn updated_now() -> FieldUpdate {
    FieldUpdate::set(FIELD_UPDATED_AT, Utc::now().to_rfc3339())
}
