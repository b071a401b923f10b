//! Profile page state for bookmark folders.
//!
//! [`ProfileController`] holds what the profile view renders (the folder
//! list, the current selection, a loading flag and one error message) and
//! turns user actions into [`FolderService`] calls. It never writes to the
//! store directly and never retries a failed call.

use tracing::debug;

use inkshelf_core::{FolderId, UserId, Work, WorkId};

use crate::models::{BookmarkFolder, Caller};
use crate::services::{ErrorKind, FolderError, FolderService, WorkCatalog};

/// The error currently shown on the profile page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileError {
    /// Human-readable message.
    pub message: String,
    /// Category, for callers that react to specific failures.
    pub kind: ErrorKind,
}

impl ProfileError {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }
}

/// Bookmark folder state of one profile page.
#[derive(Debug)]
pub struct ProfileController {
    service: FolderService,
    works: WorkCatalog,
    caller: Caller,
    owner: UserId,
    folders: Vec<BookmarkFolder>,
    selected_folder_id: Option<FolderId>,
    is_loading: bool,
    error: Option<ProfileError>,
}

impl ProfileController {
    /// Controller for `owner`'s profile as seen by `caller`.
    ///
    /// Starts empty; call [`Self::load`] to fetch folders.
    #[must_use]
    pub const fn new(
        service: FolderService,
        works: WorkCatalog,
        caller: Caller,
        owner: UserId,
    ) -> Self {
        Self {
            service,
            works,
            caller,
            owner,
            folders: Vec::new(),
            selected_folder_id: None,
            is_loading: false,
            error: None,
        }
    }

    #[must_use]
    pub fn folders(&self) -> &[BookmarkFolder] {
        &self.folders
    }

    #[must_use]
    pub const fn selected_folder_id(&self) -> Option<&FolderId> {
        self.selected_folder_id.as_ref()
    }

    /// The selected folder, if it is still loaded.
    #[must_use]
    pub fn selected_folder(&self) -> Option<&BookmarkFolder> {
        let id = self.selected_folder_id.as_ref()?;
        self.folders.iter().find(|f| &f.id == id)
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    #[must_use]
    pub const fn error(&self) -> Option<&ProfileError> {
        self.error.as_ref()
    }

    /// Whether the caller is looking at their own profile.
    #[must_use]
    pub fn is_own_profile(&self) -> bool {
        self.caller.is(&self.owner)
    }

    /// Fetch the folders visible to the caller.
    ///
    /// On failure the previously loaded folders stay in place.
    pub async fn load(&mut self) {
        let result = self.begin_load().await;
        self.finish_load(result);
    }

    /// Mark the page as loading and return the pending fetch.
    ///
    /// The future does not borrow the controller, so a view can render the
    /// loading state while it runs. Hand its output to [`Self::finish_load`].
    pub fn begin_load(
        &mut self,
    ) -> impl Future<Output = Result<Vec<BookmarkFolder>, FolderError>> + use<> {
        self.is_loading = true;
        let service = self.service.clone();
        let caller = self.caller.clone();
        let owner = self.owner.clone();
        async move { service.list_visible(&caller, &owner).await }
    }

    /// Apply the result of a fetch started with [`Self::begin_load`].
    pub fn finish_load(&mut self, result: Result<Vec<BookmarkFolder>, FolderError>) {
        self.is_loading = false;
        match result {
            Ok(folders) => {
                self.folders = folders;
                self.error = None;
            }
            Err(e) => {
                tracing::error!(owner = %self.owner, error = %e, "failed to load bookmark folders");
                self.error = Some(ProfileError::new(e.kind(), "Failed to load folders"));
            }
        }
    }

    /// Select a folder, or clear the selection if it is already selected.
    pub fn select_folder(&mut self, folder_id: FolderId) {
        if self.selected_folder_id.as_ref() == Some(&folder_id) {
            self.selected_folder_id = None;
        } else {
            self.selected_folder_id = Some(folder_id);
        }
    }

    /// Create a folder and reload the list.
    ///
    /// Returns `true` on success, so the view can close its dialog.
    pub async fn create_folder(&mut self, name: &str, is_public: bool) -> bool {
        let name = name.trim();
        if name.is_empty() {
            self.error = Some(ProfileError::new(
                ErrorKind::Validation,
                "Please enter a folder name",
            ));
            return false;
        }

        if let Err(e) = self
            .service
            .create(&self.caller, &self.owner, name, is_public)
            .await
        {
            self.error = Some(ProfileError::new(
                e.kind(),
                format!("Failed to create folder: {}", user_message(&e)),
            ));
            return false;
        }

        match self.service.list_visible(&self.caller, &self.owner).await {
            Ok(folders) => {
                self.folders = folders;
                self.error = None;
                true
            }
            Err(e) => {
                self.error = Some(ProfileError::new(e.kind(), "Failed to load folders"));
                false
            }
        }
    }

    /// Delete a folder, dropping it locally and clearing the selection if needed.
    pub async fn delete_folder(&mut self, folder_id: &FolderId) {
        if let Err(e) = self
            .service
            .delete(&self.caller, &self.owner, folder_id)
            .await
        {
            self.fail(&e);
            return;
        }

        self.folders.retain(|f| &f.id != folder_id);
        if self.selected_folder_id.as_ref() == Some(folder_id) {
            self.selected_folder_id = None;
        }
        self.error = None;
    }

    /// Add a work to the selected folder.
    pub async fn add_work(&mut self, work_id: &WorkId) {
        let Some(folder_id) = self.require_selection() else {
            return;
        };

        match self
            .service
            .add_work(&self.caller, &self.owner, &folder_id, work_id)
            .await
        {
            Ok(updated) => self.replace_folder(updated),
            Err(e) => self.fail(&e),
        }
    }

    /// Remove a work from the selected folder.
    pub async fn remove_work(&mut self, work_id: &WorkId) {
        let Some(folder_id) = self.require_selection() else {
            return;
        };

        match self
            .service
            .remove_work(&self.caller, &self.owner, &folder_id, work_id)
            .await
        {
            Ok(updated) => self.replace_folder(updated),
            Err(e) => self.fail(&e),
        }
    }

    /// The works of the selected folder, in folder order.
    ///
    /// Works that no longer exist are left out. Empty when nothing is selected.
    pub async fn selected_works(&mut self) -> Vec<Work> {
        let Some(ids) = self.selected_folder().map(|f| f.works.clone()) else {
            return Vec::new();
        };

        match self.works.resolve(&ids).await {
            Ok(works) => {
                if works.len() < ids.len() {
                    debug!(
                        missing = ids.len() - works.len(),
                        "some bookmarked works could not be resolved"
                    );
                }
                works
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load bookmarked works");
                self.error = Some(ProfileError::new(
                    ErrorKind::Internal,
                    "Failed to load bookmarked works",
                ));
                Vec::new()
            }
        }
    }

    /// Clear the error message.
    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    fn require_selection(&mut self) -> Option<FolderId> {
        let selected = self.selected_folder_id.clone();
        if selected.is_none() {
            self.error = Some(ProfileError::new(
                ErrorKind::Validation,
                "Please select a folder first",
            ));
        }
        selected
    }

    /// Take the stored folder as the local copy, picking up changes made elsewhere.
    fn replace_folder(&mut self, updated: BookmarkFolder) {
        if let Some(folder) = self.folders.iter_mut().find(|f| f.id == updated.id) {
            *folder = updated;
        }
        self.error = None;
    }

    fn fail(&mut self, err: &FolderError) {
        self.error = Some(ProfileError::new(err.kind(), user_message(err)));
    }
}

/// Message safe to show to the user; storage details stay in the logs.
fn user_message(err: &FolderError) -> String {
    match err {
        FolderError::Store(e) => {
            tracing::error!(error = %e, "bookmark folder storage error");
            "Something went wrong. Please try again.".to_owned()
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::{DocumentStore, MemoryStore};

    fn user(id: &str) -> UserId {
        UserId::parse(id).unwrap()
    }

    fn controller(caller: Caller, owner: &str) -> ProfileController {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        ProfileController::new(
            FolderService::new(store.clone()),
            WorkCatalog::new(store),
            caller,
            user(owner),
        )
    }

    #[tokio::test]
    async fn test_create_folder_refreshes_list() {
        let mut profile = controller(Caller::user(user("u1")), "u1");
        profile.load().await;
        assert!(profile.folders().is_empty());

        assert!(profile.create_folder("  Favorites ", true).await);
        assert_eq!(profile.folders().len(), 1);
        assert_eq!(profile.folders()[0].name.as_str(), "Favorites");
        assert!(profile.error().is_none());
        assert!(!profile.is_loading());
    }

    #[tokio::test]
    async fn test_create_folder_blank_name() {
        let mut profile = controller(Caller::user(user("u1")), "u1");

        assert!(!profile.create_folder("   ", true).await);
        let error = profile.error().unwrap();
        assert_eq!(error.message, "Please enter a folder name");
        assert_eq!(error.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_create_duplicate_reports_service_message() {
        let mut profile = controller(Caller::user(user("u1")), "u1");
        assert!(profile.create_folder("Favorites", true).await);

        assert!(!profile.create_folder("Favorites", false).await);
        let error = profile.error().unwrap();
        assert_eq!(
            error.message,
            "Failed to create folder: A folder named \"Favorites\" already exists"
        );
        assert_eq!(error.kind, ErrorKind::Conflict);
        assert_eq!(profile.folders().len(), 1);
    }

    #[tokio::test]
    async fn test_select_folder_toggles() {
        let mut profile = controller(Caller::user(user("u1")), "u1");
        let id = FolderId::parse("f1").unwrap();

        profile.select_folder(id.clone());
        assert_eq!(profile.selected_folder_id(), Some(&id));
        profile.select_folder(id);
        assert!(profile.selected_folder_id().is_none());
    }

    #[tokio::test]
    async fn test_add_work_requires_selection() {
        let mut profile = controller(Caller::user(user("u1")), "u1");
        profile.add_work(&WorkId::parse("w1").unwrap()).await;

        assert_eq!(profile.error().unwrap().message, "Please select a folder first");

        profile.dismiss_error();
        assert!(profile.error().is_none());
    }

    #[tokio::test]
    async fn test_add_and_remove_work_update_local_copy() {
        let mut profile = controller(Caller::user(user("u1")), "u1");
        profile.create_folder("F", false).await;
        let id = profile.folders()[0].id.clone();
        let w1 = WorkId::parse("w1").unwrap();

        profile.select_folder(id);
        profile.add_work(&w1).await;
        profile.add_work(&w1).await;
        assert_eq!(profile.selected_folder().unwrap().works, vec![w1.clone()]);

        profile.remove_work(&w1).await;
        assert!(profile.selected_folder().unwrap().works.is_empty());
        assert!(profile.error().is_none());
    }

    #[tokio::test]
    async fn test_work_changes_pick_up_concurrent_writes() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let other_tab = FolderService::new(store.clone());
        let caller = Caller::user(user("u1"));
        let mut profile = ProfileController::new(
            FolderService::new(store.clone()),
            WorkCatalog::new(store),
            caller.clone(),
            user("u1"),
        );
        profile.create_folder("F", false).await;
        let id = profile.folders()[0].id.clone();
        profile.select_folder(id.clone());
        let w1 = WorkId::parse("w1").unwrap();
        let w2 = WorkId::parse("w2").unwrap();

        other_tab
            .add_work(&caller, &user("u1"), &id, &w2)
            .await
            .unwrap();
        profile.add_work(&w1).await;

        let stored = other_tab.get(&caller, &user("u1"), &id).await.unwrap();
        let local = profile.selected_folder().unwrap();
        assert_eq!(local.works, vec![w2.clone(), w1.clone()]);
        assert_eq!(local, &stored);
        assert!(local.updated_at.is_some());

        other_tab
            .add_work(&caller, &user("u1"), &id, &WorkId::parse("w3").unwrap())
            .await
            .unwrap();
        profile.remove_work(&w2).await;
        let local = profile.selected_folder().unwrap();
        assert_eq!(local.works, vec![w1, WorkId::parse("w3").unwrap()]);
    }

    #[tokio::test]
    async fn test_loading_flag_spans_pending_fetch() {
        let mut profile = controller(Caller::user(user("u1")), "u1");
        assert!(!profile.is_loading());

        let fetch = profile.begin_load();
        assert!(profile.is_loading());

        let result = fetch.await;
        profile.finish_load(result);
        assert!(!profile.is_loading());
        assert!(profile.error().is_none());
    }

    #[tokio::test]
    async fn test_delete_selected_folder_clears_selection() {
        let mut profile = controller(Caller::user(user("u1")), "u1");
        profile.create_folder("F", false).await;
        let id = profile.folders()[0].id.clone();

        profile.select_folder(id.clone());
        profile.delete_folder(&id).await;

        assert!(profile.folders().is_empty());
        assert!(profile.selected_folder_id().is_none());
    }

    #[tokio::test]
    async fn test_visitor_cannot_create() {
        let mut profile = controller(Caller::user(user("u2")), "u1");
        assert!(!profile.is_own_profile());

        assert!(!profile.create_folder("Mine", true).await);
        let error = profile.error().unwrap();
        assert_eq!(error.kind, ErrorKind::Forbidden);
        assert_eq!(
            error.message,
            "Failed to create folder: Missing or insufficient permissions"
        );
    }

    #[tokio::test]
    async fn test_selected_works_empty_without_selection() {
        let mut profile = controller(Caller::user(user("u1")), "u1");
        assert!(profile.selected_works().await.is_empty());
        assert!(profile.error().is_none());
    }
}
