//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! inkshelf migrate
//! ```
//!
//! # Environment Variables
//!
//! - `BOOKMARKS_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! # Migration Files
//!
//! `crates/bookmarks/migrations/`

use thiserror::Error;

use super::DatabaseError;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run the bookmarks database migrations.
pub async fn run() -> Result<(), MigrationError> {
    let pool = super::connect().await?;

    tracing::info!("Running bookmarks migrations...");
    sqlx::migrate!("../bookmarks/migrations").run(&pool).await?;

    tracing::info!("Bookmarks migrations complete!");
    Ok(())
}
