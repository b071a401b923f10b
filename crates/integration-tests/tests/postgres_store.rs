//! `PostgreSQL` document store.
//!
//! Skipped unless `BOOKMARKS_TEST_DATABASE_URL` points at a scratch database.
//! Each test works in its own user's collection so runs do not interfere.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use secrecy::SecretString;
use serde_json::json;
use uuid::Uuid;

use inkshelf_bookmarks::services::{FolderError, FolderService};
use inkshelf_bookmarks::store::{
    CollectionPath, DocumentStore, FieldUpdate, PostgresStore, StoreError, create_pool, to_fields,
};
use inkshelf_core::{UserId, WorkId};
use inkshelf_integration_tests::signed_in;

async fn store() -> Option<PostgresStore> {
    let url = std::env::var("BOOKMARKS_TEST_DATABASE_URL").ok()?;
    let pool = create_pool(&SecretString::from(url)).await.unwrap();
    sqlx::migrate!("../bookmarks/migrations")
        .run(&pool)
        .await
        .unwrap();
    Some(PostgresStore::new(pool))
}

fn fresh_user() -> UserId {
    UserId::parse(&format!("test-{}", Uuid::new_v4().simple())).unwrap()
}

#[tokio::test]
async fn document_round_trip() {
    let Some(store) = store().await else {
        return;
    };
    let collection = CollectionPath::bookmark_folders(&fresh_user());

    let doc = store
        .create(&collection, to_fields(&json!({"name": "A", "works": []})).unwrap())
        .await
        .unwrap();
    let loaded = store.get(&collection, &doc.id).await.unwrap().unwrap();
    assert_eq!(loaded, doc);

    let found = store
        .find_by_field(&collection, "name", &json!("A"), 2)
        .await
        .unwrap();
    assert_eq!(found.len(), 1);

    let updated = store
        .update(
            &collection,
            &doc.id,
            &[
                FieldUpdate::array_union("works", "w1"),
                FieldUpdate::set("name", "B"),
            ],
        )
        .await
        .unwrap();
    assert_eq!(updated.fields["works"], json!(["w1"]));
    assert_eq!(updated.fields["name"], "B");

    assert!(store.delete(&collection, &doc.id).await.unwrap());
    assert!(!store.delete(&collection, &doc.id).await.unwrap());
    assert!(matches!(
        store
            .update(&collection, &doc.id, &[FieldUpdate::set("name", "C")])
            .await,
        Err(StoreError::NotFound)
    ));
    store.ping().await.unwrap();
}

#[tokio::test]
async fn concurrent_membership_updates_are_not_lost() {
    let Some(store) = store().await else {
        return;
    };
    let service = FolderService::new(Arc::new(store));
    let owner = fresh_user();
    let caller = signed_in(owner.as_str());
    let folder = service.create(&caller, &owner, "Busy", false).await.unwrap();

    let mut handles = Vec::new();
    for n in 0..16 {
        let service = service.clone();
        let caller = caller.clone();
        let owner = owner.clone();
        let folder_id = folder.id.clone();
        handles.push(tokio::spawn(async move {
            let work = WorkId::parse(&format!("w{n}")).unwrap();
            service.add_work(&caller, &owner, &folder_id, &work).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let folder = service.get(&caller, &owner, &folder.id).await.unwrap();
    assert_eq!(folder.works.len(), 16);

    assert!(matches!(
        service.create(&caller, &owner, "Busy", true).await,
        Err(FolderError::Conflict(_))
    ));
}
