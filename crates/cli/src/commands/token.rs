//! Bearer token commands.
//!
//! # Usage
//!
//! ```bash
//! inkshelf token issue --user u1 --ttl-hours 24
//! ```
//!
//! # Environment Variables
//!
//! - `BOOKMARKS_AUTH_SECRET` - HS256 signing secret shared with the server

use std::time::Duration;

use inkshelf_bookmarks::config::{ConfigError, validate_secret_strength};
use inkshelf_bookmarks::services::{Hs256Verifier, TokenError};
use inkshelf_core::{IdError, UserId};
use secrecy::SecretString;
use thiserror::Error;

const AUTH_SECRET_VAR: &str = "BOOKMARKS_AUTH_SECRET";

/// Errors that can occur while issuing tokens.
#[derive(Debug, Error)]
pub enum TokenCommandError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid user: {0}")]
    InvalidUser(#[from] IdError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Issue a token for `user` valid for `ttl_hours`.
pub fn issue(user: &str, ttl_hours: u64) -> Result<(), TokenCommandError> {
    dotenvy::dotenv().ok();

    let user = UserId::parse(user)?;
    let secret = std::env::var(AUTH_SECRET_VAR)
        .map_err(|_| TokenCommandError::MissingEnvVar(AUTH_SECRET_VAR))?;
    validate_secret_strength(&secret, AUTH_SECRET_VAR)?;

    let verifier = Hs256Verifier::new(&SecretString::from(secret));
    let token = verifier.issue(&user, Duration::from_secs(ttl_hours.saturating_mul(3600)))?;

    tracing::info!("Token for {user} (valid {ttl_hours}h):");
    #[allow(clippy::print_stdout)]
    {
        println!("{token}");
    }
    Ok(())
}
