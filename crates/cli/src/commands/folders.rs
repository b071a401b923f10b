//! Bookmark folder management commands.
//!
//! Every command goes through the folder service, so ownership and
//! duplicate-name rules apply exactly as they do over HTTP. `--as` names the
//! acting user; `--owner` defaults to it.
//!
//! # Usage
//!
//! ```bash
//! inkshelf folders list --owner u1
//! inkshelf folders create --as u1 --name "Favorites" --public
//! inkshelf folders update --as u1 --folder <id> --name "Read later" --public false
//! inkshelf folders delete --as u1 --folder <id>
//! inkshelf folders add-work --as u1 --folder <id> --work w42
//! inkshelf folders remove-work --as u1 --folder <id> --work w42
//! ```

use std::sync::Arc;

use inkshelf_bookmarks::models::{BookmarkFolder, Caller, FolderUpdate};
use inkshelf_bookmarks::services::{FolderError, FolderService};
use inkshelf_bookmarks::store::PostgresStore;
use inkshelf_core::{FolderId, IdError, UserId, WorkId};
use thiserror::Error;

use super::DatabaseError;

/// Errors that can occur during folder commands.
#[derive(Debug, Error)]
pub enum FolderCommandError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Invalid argument: {0}")]
    InvalidId(#[from] IdError),

    #[error(transparent)]
    Folder(#[from] FolderError),
}

/// Folder service bound to the configured database.
pub struct FolderCommands {
    service: FolderService,
}

/// Connect the folder service to `PostgreSQL`.
pub async fn connect() -> Result<FolderCommands, FolderCommandError> {
    let pool = super::connect().await?;
    Ok(FolderCommands {
        service: FolderService::new(Arc::new(PostgresStore::new(pool))),
    })
}

/// Resolve `--as` and `--owner` into a caller and an owner.
fn identities(caller: &str, owner: Option<&str>) -> Result<(Caller, UserId), IdError> {
    let caller = UserId::parse(caller)?;
    let owner = owner.map(UserId::parse).transpose()?.unwrap_or_else(|| caller.clone());
    Ok((Caller::user(caller), owner))
}

/// One-line summary of a folder.
fn describe_folder(action: &str, folder: &BookmarkFolder) -> String {
    format!(
        "{action} folder {} \"{}\" (public: {}, works: [{}])",
        folder.id,
        folder.name,
        folder.is_public,
        folder
            .works
            .iter()
            .map(WorkId::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    )
}

#[allow(clippy::print_stdout)]
fn print_folder(action: &str, folder: &BookmarkFolder) {
    println!("{}", describe_folder(action, folder));
}

impl FolderCommands {
    /// List the folders of `owner` visible to `caller`.
    pub async fn list(&self, owner: &str, caller: Option<&str>) -> Result<(), FolderCommandError> {
        let owner = UserId::parse(owner)?;
        let caller = Caller::from(caller.map(UserId::parse).transpose()?);

        let folders = self.service.list_visible(&caller, &owner).await?;
        #[allow(clippy::print_stdout)]
        {
            println!("{} folder(s) for {owner}", folders.len());
        }
        for folder in &folders {
            print_folder("-", folder);
        }
        Ok(())
    }

    /// Create a folder.
    pub async fn create(
        &self,
        caller: &str,
        owner: Option<&str>,
        name: &str,
        is_public: bool,
    ) -> Result<(), FolderCommandError> {
        let (caller, owner) = identities(caller, owner)?;

        let folder = self.service.create(&caller, &owner, name, is_public).await?;
        print_folder("Created", &folder);
        Ok(())
    }

    /// Rename a folder and/or change its visibility.
    pub async fn update(
        &self,
        caller: &str,
        owner: Option<&str>,
        folder: &str,
        name: Option<String>,
        is_public: Option<bool>,
    ) -> Result<(), FolderCommandError> {
        let (caller, owner) = identities(caller, owner)?;
        let folder_id = FolderId::parse(folder)?;

        let folder = self
            .service
            .update(&caller, &owner, &folder_id, FolderUpdate { name, is_public })
            .await?;
        print_folder("Updated", &folder);
        Ok(())
    }

    /// Delete a folder.
    pub async fn delete(
        &self,
        caller: &str,
        owner: Option<&str>,
        folder: &str,
    ) -> Result<(), FolderCommandError> {
        let (caller, owner) = identities(caller, owner)?;
        let folder_id = FolderId::parse(folder)?;

        self.service.delete(&caller, &owner, &folder_id).await?;
        #[allow(clippy::print_stdout)]
        {
            println!("Deleted folder {folder_id}");
        }
        Ok(())
    }

    /// Add a work to a folder.
    pub async fn add_work(
        &self,
        caller: &str,
        owner: Option<&str>,
        folder: &str,
        work: &str,
    ) -> Result<(), FolderCommandError> {
        let (caller, owner) = identities(caller, owner)?;
        let folder_id = FolderId::parse(folder)?;
        let work_id = WorkId::parse(work)?;

        let folder = self
            .service
            .add_work(&caller, &owner, &folder_id, &work_id)
            .await?;
        print_folder("Updated", &folder);
        Ok(())
    }

    /// Remove a work from a folder.
    pub async fn remove_work(
        &self,
        caller: &str,
        owner: Option<&str>,
        folder: &str,
        work: &str,
    ) -> Result<(), FolderCommandError> {
        let (caller, owner) = identities(caller, owner)?;
        let folder_id = FolderId::parse(folder)?;
        let work_id = WorkId::parse(work)?;

        let folder = self
            .service
            .remove_work(&caller, &owner, &folder_id, &work_id)
            .await?;
        print_folder("Updated", &folder);
        Ok(())
    }
}
