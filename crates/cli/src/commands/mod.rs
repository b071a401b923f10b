//! CLI command implementations.

pub mod folders;
pub mod migrate;
pub mod token;

/// Errors shared by commands that need the database.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// No database URL configured.
    #[error("Missing environment variable: BOOKMARKS_DATABASE_URL (or DATABASE_URL)")]
    MissingDatabaseUrl,

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Connect(#[from] sqlx::Error),
}

/// Connect to the bookmarks database.
pub async fn connect() -> Result<sqlx::PgPool, DatabaseError> {
    dotenvy::dotenv().ok();

    let database_url = inkshelf_bookmarks::config::database_url_from_env()
        .ok_or(DatabaseError::MissingDatabaseUrl)?;

    tracing::info!("Connecting to bookmarks database...");
    Ok(inkshelf_bookmarks::store::create_pool(&database_url).await?)
}
