//! Inkshelf CLI - database migrations and bookmark folder management.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! inkshelf migrate
//!
//! # List a user's folders as seen by another user
//! inkshelf folders list --owner u1 --as u2
//!
//! # Create a folder and add a work to it
//! inkshelf folders create --as u1 --name Favorites --public
//! inkshelf folders add-work --as u1 --folder <folder-id> --work w42
//!
//! # Issue a bearer token for API testing
//! inkshelf token issue --user u1 --ttl-hours 24
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `folders` - Inspect and change bookmark folders through the folder service
//! - `token issue` - Issue an HS256 bearer token

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "inkshelf")]
#[command(author, version, about = "Inkshelf CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage bookmark folders
    Folders {
        #[command(subcommand)]
        action: FolderAction,
    },
    /// Manage bearer tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
}

#[derive(Subcommand)]
enum FolderAction {
    /// List a user's folders
    List {
        /// Folder owner
        #[arg(short, long)]
        owner: String,

        /// Act as this user (anonymous if omitted)
        #[arg(long = "as")]
        caller: Option<String>,
    },
    /// Create a folder
    Create {
        /// Act as this user
        #[arg(long = "as")]
        caller: String,

        /// Folder owner (defaults to the acting user)
        #[arg(short, long)]
        owner: Option<String>,

        /// Folder name
        #[arg(short, long)]
        name: String,

        /// Make the folder visible to other users
        #[arg(long)]
        public: bool,
    },
    /// Rename a folder or change its visibility
    Update {
        #[arg(long = "as")]
        caller: String,

        #[arg(short, long)]
        owner: Option<String>,

        #[arg(short, long)]
        folder: String,

        /// New name
        #[arg(short, long)]
        name: Option<String>,

        /// New visibility
        #[arg(long)]
        public: Option<bool>,
    },
    /// Delete a folder
    Delete {
        #[arg(long = "as")]
        caller: String,

        #[arg(short, long)]
        owner: Option<String>,

        #[arg(short, long)]
        folder: String,
    },
    /// Add a work to a folder
    AddWork {
        #[arg(long = "as")]
        caller: String,

        #[arg(short, long)]
        owner: Option<String>,

        #[arg(short, long)]
        folder: String,

        #[arg(short, long)]
        work: String,
    },
    /// Remove a work from a folder
    RemoveWork {
        #[arg(long = "as")]
        caller: String,

        #[arg(short, long)]
        owner: Option<String>,

        #[arg(short, long)]
        folder: String,

        #[arg(short, long)]
        work: String,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Issue a token signed with `BOOKMARKS_AUTH_SECRET`
    Issue {
        /// User the token is issued to
        #[arg(short, long)]
        user: String,

        /// Token lifetime in hours
        #[arg(long, default_value_t = 24)]
        ttl_hours: u64,
    },
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so command output on stdout stays pipeable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Folders { action } => {
            let folders = commands::folders::connect().await?;
            match action {
                FolderAction::List { owner, caller } => {
                    folders.list(&owner, caller.as_deref()).await?;
                }
                FolderAction::Create {
                    caller,
                    owner,
                    name,
                    public,
                } => {
                    folders
                        .create(&caller, owner.as_deref(), &name, public)
                        .await?;
                }
                FolderAction::Update {
                    caller,
                    owner,
                    folder,
                    name,
                    public,
                } => {
                    folders
                        .update(&caller, owner.as_deref(), &folder, name, public)
                        .await?;
                }
                FolderAction::Delete {
                    caller,
                    owner,
                    folder,
                } => {
                    folders.delete(&caller, owner.as_deref(), &folder).await?;
                }
                FolderAction::AddWork {
                    caller,
                    owner,
                    folder,
                    work,
                } => {
                    folders
                        .add_work(&caller, owner.as_deref(), &folder, &work)
                        .await?;
                }
                FolderAction::RemoveWork {
                    caller,
                    owner,
                    folder,
                    work,
                } => {
                    folders
                        .remove_work(&caller, owner.as_deref(), &folder, &work)
                        .await?;
                }
            }
        }
        Commands::Token { action } => match action {
            TokenAction::Issue { user, ttl_hours } => {
                commands::token::issue(&user, ttl_hours)?;
            }
        },
    }
    Ok(())
}
