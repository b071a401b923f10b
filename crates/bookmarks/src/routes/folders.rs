//! Bookmark folder API handlers.
//!
//! Thin transport over [`FolderService`](crate::services::FolderService):
//! handlers parse path IDs, resolve the caller, and map errors to JSON.

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    routing::{get, put},
};
use serde::Deserialize;

use inkshelf_core::{FolderId, UserId, Work, WorkId};

use crate::error::{AppError, Result};
use crate::middleware::CurrentCaller;
use crate::models::{BookmarkFolder, FolderUpdate};
use crate::state::AppState;

/// Build the folders router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/users/{owner}/folders",
            get(list_folders).post(create_folder),
        )
        .route(
            "/api/users/{owner}/folders/{folder}",
            get(get_folder).patch(update_folder).delete(delete_folder),
        )
        .route(
            "/api/users/{owner}/folders/{folder}/works",
            get(list_folder_works),
        )
        .route(
            "/api/users/{owner}/folders/{folder}/works/{work}",
            put(add_work).delete(remove_work),
        )
}

/// Request for creating a folder.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    pub name: String,
    #[serde(default)]
    pub is_public: bool,
}

/// Unwrap a JSON body, reporting malformed input in the API's error format.
fn json_body<T>(body: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    body.map(|Json(value)| value)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// Unwrap path parameters, reporting undecodable segments in the API's error format.
fn path_params<T>(path: std::result::Result<Path<T>, PathRejection>) -> Result<T> {
    path.map(|Path(value)| value)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// List the owner's folders visible to the caller.
///
/// # Errors
///
/// Returns an error if the owner ID is invalid or the store fails.
pub async fn list_folders(
    CurrentCaller(caller): CurrentCaller,
    State(state): State<AppState>,
    owner: std::result::Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<BookmarkFolder>>> {
    let owner = UserId::parse(&path_params(owner)?)?;
    let folders = state.folders().list_visible(&caller, &owner).await?;
    Ok(Json(folders))
}

/// Create a folder.
///
/// # Errors
///
/// Returns an error if the caller is not the owner, the name is invalid or
/// already used, or the store fails.
pub async fn create_folder(
    CurrentCaller(caller): CurrentCaller,
    State(state): State<AppState>,
    owner: std::result::Result<Path<String>, PathRejection>,
    body: std::result::Result<Json<CreateFolderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BookmarkFolder>)> {
    let owner = UserId::parse(&path_params(owner)?)?;
    let body = json_body(body)?;

    let folder = state
        .folders()
        .create(&caller, &owner, &body.name, body.is_public)
        .await?;
    Ok((StatusCode::CREATED, Json(folder)))
}

/// Get a single folder.
///
/// # Errors
///
/// Returns `404` if the folder does not exist or is private to another user.
pub async fn get_folder(
    CurrentCaller(caller): CurrentCaller,
    State(state): State<AppState>,
    path: std::result::Result<Path<(String, String)>, PathRejection>,
) -> Result<Json<BookmarkFolder>> {
    let (owner, folder) = path_params(path)?;
    let owner = UserId::parse(&owner)?;
    let folder_id = FolderId::parse(&folder)?;

    let folder = state.folders().get(&caller, &owner, &folder_id).await?;
    Ok(Json(folder))
}

/// Resolve a folder's works, in folder order.
///
/// # Errors
///
/// Returns `404` if the folder does not exist or is private to another user.
pub async fn list_folder_works(
    CurrentCaller(caller): CurrentCaller,
    State(state): State<AppState>,
    path: std::result::Result<Path<(String, String)>, PathRejection>,
) -> Result<Json<Vec<Work>>> {
    let (owner, folder) = path_params(path)?;
    let owner = UserId::parse(&owner)?;
    let folder_id = FolderId::parse(&folder)?;

    let folder = state.folders().get(&caller, &owner, &folder_id).await?;
    let works = state
        .works()
        .resolve(&folder.works)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Json(works))
}

/// Rename a folder and/or change its visibility.
///
/// # Errors
///
/// Returns an error if the caller is not the owner, the folder is missing,
/// the new name is invalid or taken, or the store fails.
pub async fn update_folder(
    CurrentCaller(caller): CurrentCaller,
    State(state): State<AppState>,
    path: std::result::Result<Path<(String, String)>, PathRejection>,
    body: std::result::Result<Json<FolderUpdate>, JsonRejection>,
) -> Result<Json<BookmarkFolder>> {
    let (owner, folder) = path_params(path)?;
    let owner = UserId::parse(&owner)?;
    let folder_id = FolderId::parse(&folder)?;
    let updates = json_body(body)?;

    let folder = state
        .folders()
        .update(&caller, &owner, &folder_id, updates)
        .await?;
    Ok(Json(folder))
}

/// Delete a folder.
///
/// # Errors
///
/// Returns an error if the caller is not the owner or the store fails.
pub async fn delete_folder(
    CurrentCaller(caller): CurrentCaller,
    State(state): State<AppState>,
    path: std::result::Result<Path<(String, String)>, PathRejection>,
) -> Result<StatusCode> {
    let (owner, folder) = path_params(path)?;
    let owner = UserId::parse(&owner)?;
    let folder_id = FolderId::parse(&folder)?;

    state.folders().delete(&caller, &owner, &folder_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Add a work to a folder.
///
/// # Errors
///
/// Returns an error if the caller is not the owner, the folder is missing,
/// or the store fails.
pub async fn add_work(
    CurrentCaller(caller): CurrentCaller,
    State(state): State<AppState>,
    path: std::result::Result<Path<(String, String, String)>, PathRejection>,
) -> Result<Json<BookmarkFolder>> {
    let (owner, folder, work) = path_params(path)?;
    let owner = UserId::parse(&owner)?;
    let folder_id = FolderId::parse(&folder)?;
    let work_id = WorkId::parse(&work)?;

    let folder = state
        .folders()
        .add_work(&caller, &owner, &folder_id, &work_id)
        .await?;
    Ok(Json(folder))
}

/// Remove a work from a folder.
///
/// # Errors
///
/// Returns an error if the caller is not the owner, the folder is missing,
/// or the store fails.
pub async fn remove_work(
    CurrentCaller(caller): CurrentCaller,
    State(state): State<AppState>,
    path: std::result::Result<Path<(String, String, String)>, PathRejection>,
) -> Result<Json<BookmarkFolder>> {
    let (owner, folder, work) = path_params(path)?;
    let owner = UserId::parse(&owner)?;
    let folder_id = FolderId::parse(&folder)?;
    let work_id = WorkId::parse(&work)?;

    let folder = state
        .folders()
        .remove_work(&caller, &owner, &folder_id, &work_id)
        .await?;
    Ok(Json(folder))
}
