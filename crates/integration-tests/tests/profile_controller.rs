//! Profile page state driven through the controller.

#![allow(clippy::unwrap_used)]

use inkshelf_bookmarks::models::Caller;
use inkshelf_bookmarks::profile::ProfileController;
use inkshelf_bookmarks::services::ErrorKind;
use inkshelf_core::WorkId;
use inkshelf_integration_tests::{TestContext, signed_in, user_id};

fn profile(ctx: &TestContext, caller: Caller, owner: &str) -> ProfileController {
    ProfileController::new(ctx.folders.clone(), ctx.works.clone(), caller, user_id(owner))
}

fn work(id: &str) -> WorkId {
    WorkId::parse(id).unwrap()
}

#[tokio::test]
async fn owner_curates_a_folder() {
    let ctx = TestContext::new();
    ctx.publish_work("w1", "Solo Climber").await.unwrap();
    ctx.publish_work("w2", "Night Market").await.unwrap();

    let mut page = profile(&ctx, signed_in("u1"), "u1");
    page.load().await;
    assert!(page.is_own_profile());
    assert!(page.folders().is_empty());

    assert!(page.create_folder("Favorites", false).await);
    let folder_id = page.folders()[0].id.clone();
    page.select_folder(folder_id.clone());

    page.add_work(&work("w2")).await;
    page.add_work(&work("w1")).await;
    page.add_work(&work("w2")).await;

    let titles: Vec<_> = page
        .selected_works()
        .await
        .into_iter()
        .map(|w| w.title)
        .collect();
    assert_eq!(titles, vec!["Night Market", "Solo Climber"]);

    // The local copy matches what the store holds
    let stored = ctx.folders.list(&user_id("u1")).await.unwrap();
    assert_eq!(stored[0].works, page.selected_folder().unwrap().works);

    page.delete_folder(&folder_id).await;
    assert!(page.folders().is_empty());
    assert!(page.selected_folder_id().is_none());
    assert!(page.error().is_none());
}

#[tokio::test]
async fn deleted_works_are_skipped() {
    let ctx = TestContext::new();
    ctx.publish_work("w1", "Still Here").await.unwrap();

    let mut page = profile(&ctx, signed_in("u1"), "u1");
    page.create_folder("Mixed", true).await;
    page.select_folder(page.folders()[0].id.clone());
    page.add_work(&work("gone")).await;
    page.add_work(&work("w1")).await;

    let works = page.selected_works().await;
    assert_eq!(works.len(), 1);
    assert_eq!(works[0].id.as_str(), "w1");
    assert_eq!(page.selected_folder().unwrap().works.len(), 2);
}

#[tokio::test]
async fn visitor_sees_only_public_folders() {
    let ctx = TestContext::new();
    let mut owner = profile(&ctx, signed_in("u1"), "u1");
    owner.create_folder("Private", false).await;
    owner.create_folder("Public", true).await;
    assert_eq!(owner.folders().len(), 2);

    let mut visitor = profile(&ctx, signed_in("u2"), "u1");
    visitor.load().await;
    assert!(!visitor.is_own_profile());
    assert_eq!(visitor.folders().len(), 1);
    assert_eq!(visitor.folders()[0].name.as_str(), "Public");

    let mut anonymous = profile(&ctx, Caller::Anonymous, "u1");
    anonymous.load().await;
    assert_eq!(anonymous.folders().len(), 1);
}

#[tokio::test]
async fn visitor_changes_are_rejected() {
    let ctx = TestContext::new();
    let mut owner = profile(&ctx, signed_in("u1"), "u1");
    owner.create_folder("Public", true).await;

    let mut visitor = profile(&ctx, signed_in("u2"), "u1");
    visitor.load().await;
    visitor.select_folder(visitor.folders()[0].id.clone());
    visitor.add_work(&work("w1")).await;

    let error = visitor.error().unwrap();
    assert_eq!(error.kind, ErrorKind::Forbidden);
    assert_eq!(error.message, "Missing or insufficient permissions");
    assert!(visitor.folders()[0].works.is_empty());

    let mut anonymous = profile(&ctx, Caller::Anonymous, "u1");
    anonymous.load().await;
    let folder_id = anonymous.folders()[0].id.clone();
    anonymous.delete_folder(&folder_id).await;
    assert_eq!(anonymous.error().unwrap().kind, ErrorKind::Unauthenticated);
    assert_eq!(anonymous.folders().len(), 1);
}

#[tokio::test]
async fn successful_action_clears_previous_error() {
    let ctx = TestContext::new();
    let mut page = profile(&ctx, signed_in("u1"), "u1");

    page.add_work(&work("w1")).await;
    assert_eq!(page.error().unwrap().message, "Please select a folder first");

    page.create_folder("F", false).await;
    assert!(page.error().is_none());
}

#[tokio::test]
async fn too_long_name_reports_validation() {
    let ctx = TestContext::new();
    let mut page = profile(&ctx, signed_in("u1"), "u1");

    assert!(!page.create_folder(&"x".repeat(101), false).await);
    let error = page.error().unwrap();
    assert_eq!(error.kind, ErrorKind::Validation);
    assert!(error.message.starts_with("Failed to create folder: "));
}
