//! In-memory document store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    CollectionPath, Document, DocumentStore, FieldUpdate, Fields, StoreError, apply_updates,
};

/// Process-local document store.
///
/// Collections keep documents in insertion order. All writes take the same
/// lock, so an `update` is atomic with respect to every other writer.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    writes: AtomicU64,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of write operations that reached the store.
    ///
    /// Deletes of missing documents and failed updates are not counted.
    #[must_use]
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(
        &self,
        collection: &CollectionPath,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection.as_str())
            .and_then(|docs| docs.iter().find(|doc| doc.id == id))
            .cloned())
    }

    async fn list(&self, collection: &CollectionPath) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection.as_str())
            .cloned()
            .unwrap_or_default())
    }

    async fn find_by_field(
        &self,
        collection: &CollectionPath,
        field: &str,
        value: &Value,
        limit: usize,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection.as_str())
            .map(|docs| {
                docs.iter()
                    .filter(|doc| doc.fields.get(field) == Some(value))
                    .take(limit)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn create(
        &self,
        collection: &CollectionPath,
        fields: Fields,
    ) -> Result<Document, StoreError> {
        let document = Document {
            id: Uuid::new_v4().simple().to_string(),
            fields,
        };

        let mut collections = self.collections.write().await;
        collections
            .entry(collection.as_str().to_owned())
            .or_default()
            .push(document.clone());
        self.record_write();

        Ok(document)
    }

    async fn replace(
        &self,
        collection: &CollectionPath,
        id: &str,
        fields: Fields,
    ) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let docs = collections
            .entry(collection.as_str().to_owned())
            .or_default();

        match docs.iter_mut().find(|doc| doc.id == id) {
            Some(existing) => existing.fields = fields,
            None => docs.push(Document {
                id: id.to_owned(),
                fields,
            }),
        }
        self.record_write();

        Ok(())
    }

    async fn update(
        &self,
        collection: &CollectionPath,
        id: &str,
        updates: &[FieldUpdate],
    ) -> Result<Document, StoreError> {
        let mut collections = self.collections.write().await;
        let existing = collections
            .get_mut(collection.as_str())
            .and_then(|docs| docs.iter_mut().find(|doc| doc.id == id))
            .ok_or(StoreError::NotFound)?;

        // Apply to a copy so a failed transform leaves the document untouched
        let mut fields = existing.fields.clone();
        apply_updates(&mut fields, updates)?;
        existing.fields = fields;
        self.record_write();

        Ok(existing.clone())
    }

    async fn delete(&self, collection: &CollectionPath, id: &str) -> Result<bool, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection.as_str()) else {
            return Ok(false);
        };

        let before = docs.len();
        docs.retain(|doc| doc.id != id);
        let deleted = docs.len() < before;
        if deleted {
            self.record_write();
        }

        Ok(deleted)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn collection() -> CollectionPath {
        CollectionPath::root("things")
    }

    fn body(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_unique_ids() {
        let store = MemoryStore::new();
        let a = store.create(&collection(), body(json!({"n": 1}))).await.unwrap();
        let b = store.create(&collection(), body(json!({"n": 2}))).await.unwrap();

        assert!(!a.id.is_empty());
        assert_ne!(a.id, b.id);
        assert_eq!(store.write_count(), 2);
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let store = MemoryStore::new();
        for n in 0..5 {
            store.create(&collection(), body(json!({"n": n}))).await.unwrap();
        }

        let docs = store.list(&collection()).await.unwrap();
        let order: Vec<_> = docs.iter().map(|d| d.fields["n"].clone()).collect();
        assert_eq!(order, vec![json!(0), json!(1), json!(2), json!(3), json!(4)]);
    }

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let store = MemoryStore::new();
        let other = CollectionPath::root("others");
        store.create(&collection(), body(json!({"n": 1}))).await.unwrap();

        assert!(store.list(&other).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_by_field_respects_limit() {
        let store = MemoryStore::new();
        for _ in 0..3 {
            store.create(&collection(), body(json!({"tag": "x"}))).await.unwrap();
        }
        store.create(&collection(), body(json!({"tag": "y"}))).await.unwrap();

        let found = store
            .find_by_field(&collection(), "tag", &json!("x"), 2)
            .await
            .unwrap();
        assert_eq!(found.len(), 2);

        let none = store
            .find_by_field(&collection(), "tag", &json!("z"), 10)
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_document() {
        let store = MemoryStore::new();
        let result = store
            .update(&collection(), "nope", &[FieldUpdate::set("a", 1)])
            .await;
        assert!(matches!(result, Err(StoreError::NotFound)));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_update_leaves_document_untouched() {
        let store = MemoryStore::new();
        let doc = store
            .create(&collection(), body(json!({"a": 1, "works": "bad"})))
            .await
            .unwrap();

        let result = store
            .update(
                &collection(),
                &doc.id,
                &[
                    FieldUpdate::set("a", 2),
                    FieldUpdate::array_union("works", "w1"),
                ],
            )
            .await;
        assert!(matches!(result, Err(StoreError::DataCorruption(_))));

        let stored = store.get(&collection(), &doc.id).await.unwrap().unwrap();
        assert_eq!(stored.fields["a"], 1);
    }

    #[tokio::test]
    async fn test_replace_upserts() {
        let store = MemoryStore::new();
        store
            .replace(&collection(), "fixed", body(json!({"v": 1})))
            .await
            .unwrap();
        store
            .replace(&collection(), "fixed", body(json!({"v": 2})))
            .await
            .unwrap();

        let docs = store.list(&collection()).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].fields["v"], 2);
    }

    #[tokio::test]
    async fn test_delete_reports_existence() {
        let store = MemoryStore::new();
        let doc = store.create(&collection(), Fields::new()).await.unwrap();

        assert!(store.delete(&collection(), &doc.id).await.unwrap());
        assert!(!store.delete(&collection(), &doc.id).await.unwrap());
        assert!(store.get(&collection(), &doc.id).await.unwrap().is_none());
    }
}
