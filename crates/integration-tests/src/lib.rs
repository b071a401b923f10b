//! Integration tests for Inkshelf bookmarks.
//!
//! # Running Tests
//!
//! ```bash
//! # In-memory store only
//! cargo test -p inkshelf-integration-tests
//!
//! # Also exercise the PostgreSQL store (the database is migrated by the tests)
//! BOOKMARKS_TEST_DATABASE_URL=postgres://localhost/inkshelf_test \
//!     cargo test -p inkshelf-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `folder_service` - ownership, uniqueness and membership rules
//! - `profile_controller` - profile page state transitions
//! - `http_api` - JSON API through the full router and middleware stack
//! - `postgres_store` - `PostgreSQL` backend (skipped without a database)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use serde_json::json;

use inkshelf_bookmarks::config::{BookmarksConfig, SentryConfig};
use inkshelf_bookmarks::models::Caller;
use inkshelf_bookmarks::services::{FolderService, Hs256Verifier, WorkCatalog};
use inkshelf_bookmarks::state::AppState;
use inkshelf_bookmarks::store::{CollectionPath, DocumentStore, MemoryStore, StoreError, to_fields};
use inkshelf_core::UserId;

/// Auth secret used by test servers.
pub const TEST_AUTH_SECRET: &str = "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%";

/// Everything a test needs, backed by one in-memory store.
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub folders: FolderService,
    pub works: WorkCatalog,
    pub verifier: Hs256Verifier,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    /// Fresh context with an empty store.
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            folders: FolderService::new(store.clone()),
            works: WorkCatalog::new(store.clone()),
            verifier: Hs256Verifier::new(&test_secret()),
            store,
        }
    }

    /// Application state over this context's store.
    #[must_use]
    pub fn app_state(&self) -> AppState {
        AppState::new(test_config(), self.store.clone())
    }

    /// The full HTTP application over this context's store.
    #[must_use]
    pub fn app(&self) -> axum::Router {
        inkshelf_bookmarks::app(self.app_state())
    }

    /// A bearer token for `user`.
    ///
    /// # Panics
    ///
    /// Panics if the token cannot be encoded.
    #[must_use]
    pub fn token(&self, user: &str) -> String {
        self.verifier
            .issue(&user_id(user), Duration::from_secs(3600))
            .expect("failed to issue test token")
    }

    /// Publish a work at `works/{id}`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store rejects the write.
    pub async fn publish_work(&self, id: &str, title: &str) -> Result<(), StoreError> {
        let body = json!({
            "title": title,
            "description": "",
            "type": "manhwa",
            "coverUrl": format!("https://cdn.inkshelf.test/{id}.jpg"),
            "authorId": "author-1",
            "authorName": "Author One",
            "status": "ongoing",
            "tags": ["action"],
            "likes": 0,
            "views": 0,
            "createdAt": "2025-01-01T00:00:00Z",
            "updatedAt": "2025-01-01T00:00:00Z"
        });
        self.store
            .replace(&CollectionPath::works(), id, to_fields(&body)?)
            .await
    }
}

/// Server configuration for tests (in-memory store, no Sentry).
#[must_use]
pub fn test_config() -> BookmarksConfig {
    BookmarksConfig {
        database_url: None,
        host: std::net::IpAddr::from([127, 0, 0, 1]),
        port: 0,
        auth_secret: test_secret(),
        sentry: SentryConfig::default(),
    }
}

fn test_secret() -> SecretString {
    SecretString::from(TEST_AUTH_SECRET)
}

/// Parse a user ID.
///
/// # Panics
///
/// Panics if `id` is not a valid user ID.
#[must_use]
pub fn user_id(id: &str) -> UserId {
    UserId::parse(id).expect("invalid test user id")
}

/// A signed-in caller.
#[must_use]
pub fn signed_in(id: &str) -> Caller {
    Caller::user(user_id(id))
}
