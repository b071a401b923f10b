//! HTTP route handlers for the bookmarks API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                                         - Liveness check
//! GET    /health/ready                                   - Store readiness check
//!
//! # Bookmark folders (JSON)
//! GET    /api/users/{owner}/folders                      - Folders visible to the caller
//! POST   /api/users/{owner}/folders                      - Create folder
//! GET    /api/users/{owner}/folders/{folder}             - Folder detail
//! PATCH  /api/users/{owner}/folders/{folder}             - Rename / change visibility
//! DELETE /api/users/{owner}/folders/{folder}             - Delete folder (204)
//! GET    /api/users/{owner}/folders/{folder}/works       - Resolved works, in folder order
//! PUT    /api/users/{owner}/folders/{folder}/works/{work} - Add work
//! DELETE /api/users/{owner}/folders/{folder}/works/{work} - Remove work
//! ```

pub mod folders;

use axum::{Router, extract::State, http::StatusCode, routing::get};

use crate::state::AppState;

/// Create the main router with all routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(folders::router())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the document store is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.store().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
