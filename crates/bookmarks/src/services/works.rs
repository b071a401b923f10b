//! Read-only access to published works.

use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use inkshelf_core::{Work, WorkId};

use crate::store::{CollectionPath, Document, DocumentStore, StoreError};

/// Looks up works stored at `works/{id}`.
#[derive(Clone)]
pub struct WorkCatalog {
    store: Arc<dyn DocumentStore>,
}

impl std::fmt::Debug for WorkCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkCatalog").finish_non_exhaustive()
    }
}

impl WorkCatalog {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Get a single work.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DataCorruption` if the stored work is invalid.
    pub async fn get(&self, id: &WorkId) -> Result<Option<Work>, StoreError> {
        self.store
            .get(&CollectionPath::works(), id.as_str())
            .await?
            .map(work_from_document)
            .transpose()
    }

    /// Resolve work IDs in order, skipping works that no longer exist or
    /// cannot be read.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` only if the store itself fails.
    pub async fn resolve(&self, ids: &[WorkId]) -> Result<Vec<Work>, StoreError> {
        let mut works = Vec::with_capacity(ids.len());

        for id in ids {
            match self.get(id).await {
                Ok(Some(work)) => works.push(work),
                Ok(None) => {}
                Err(StoreError::DataCorruption(reason)) => {
                    warn!(work_id = %id, %reason, "skipping unreadable work");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(works)
    }
}

fn work_from_document(document: Document) -> Result<Work, StoreError> {
    let Document { id, mut fields } = document;
    fields.insert("id".to_owned(), Value::String(id.clone()));

    serde_json::from_value(Value::Object(fields))
        .map_err(|e| StoreError::DataCorruption(format!("invalid work {id}: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::store::{MemoryStore, to_fields};

    async fn seed(store: &MemoryStore, id: &str, title: &str) {
        let body = json!({
            "title": title,
            "type": "manga",
            "authorId": "author",
            "authorName": "Author",
            "createdAt": "2025-01-01T00:00:00Z",
            "updatedAt": "2025-01-01T00:00:00Z"
        });
        store
            .replace(&CollectionPath::works(), id, to_fields(&body).unwrap())
            .await
            .unwrap();
    }

    fn ids(values: &[&str]) -> Vec<WorkId> {
        values.iter().map(|v| WorkId::parse(v).unwrap()).collect()
    }

    #[tokio::test]
    async fn test_resolve_keeps_order_and_skips_missing() {
        let store = Arc::new(MemoryStore::new());
        seed(&store, "w1", "One").await;
        seed(&store, "w2", "Two").await;
        let catalog = WorkCatalog::new(store);

        let works = catalog.resolve(&ids(&["w2", "gone", "w1"])).await.unwrap();
        let titles: Vec<_> = works.iter().map(|w| w.title.as_str()).collect();
        assert_eq!(titles, vec!["Two", "One"]);
        assert_eq!(works[0].id.as_str(), "w2");
    }

    #[tokio::test]
    async fn test_resolve_skips_corrupt_work() {
        let store = Arc::new(MemoryStore::new());
        seed(&store, "w1", "One").await;
        store
            .replace(
                &CollectionPath::works(),
                "bad",
                to_fields(&json!({"title": 1})).unwrap(),
            )
            .await
            .unwrap();
        let catalog = WorkCatalog::new(store);

        let works = catalog.resolve(&ids(&["bad", "w1"])).await.unwrap();
        assert_eq!(works.len(), 1);
        assert!(catalog.get(&WorkId::parse("bad").unwrap()).await.is_err());
    }
}
