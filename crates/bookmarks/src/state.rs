//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::BookmarksConfig;
use crate::services::{FolderService, Hs256Verifier, TokenVerifier, WorkCatalog};
use crate::store::DocumentStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the store-backed services and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: BookmarksConfig,
    store: Arc<dyn DocumentStore>,
    folders: FolderService,
    works: WorkCatalog,
    verifier: Arc<dyn TokenVerifier>,
}

impl AppState {
    /// Create application state over a document store.
    ///
    /// Bearer tokens are verified with the configured HS256 secret.
    #[must_use]
    pub fn new(config: BookmarksConfig, store: Arc<dyn DocumentStore>) -> Self {
        let verifier = Arc::new(Hs256Verifier::new(&config.auth_secret));
        Self::with_verifier(config, store, verifier)
    }

    /// Create application state with a custom token verifier.
    #[must_use]
    pub fn with_verifier(
        config: BookmarksConfig,
        store: Arc<dyn DocumentStore>,
        verifier: Arc<dyn TokenVerifier>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                folders: FolderService::new(store.clone()),
                works: WorkCatalog::new(store.clone()),
                store,
                verifier,
            }),
        }
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &BookmarksConfig {
        &self.inner.config
    }

    /// Get a reference to the document store.
    #[must_use]
    pub fn store(&self) -> &dyn DocumentStore {
        self.inner.store.as_ref()
    }

    /// Get a reference to the bookmark folder service.
    #[must_use]
    pub fn folders(&self) -> &FolderService {
        &self.inner.folders
    }

    /// Get a reference to the work catalog.
    #[must_use]
    pub fn works(&self) -> &WorkCatalog {
        &self.inner.works
    }

    /// Get a reference to the bearer token verifier.
    #[must_use]
    pub fn verifier(&self) -> &dyn TokenVerifier {
        self.inner.verifier.as_ref()
    }
}
