//! Inkshelf bookmarks library.
//!
//! Bookmark folders let signed-in users group works (manga, manhwa, novels,
//! art) on their profile. This crate provides:
//!
//! - [`store`] - hierarchical document store (in-memory and `PostgreSQL`)
//! - [`services::FolderService`] - folder CRUD and work membership with
//!   ownership checks and duplicate-name prevention
//! - [`profile::ProfileController`] - profile page state over the service
//! - [`app`] - the axum JSON API

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod profile;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

use axum::{Router, extract::Request, middleware as axum_middleware};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the HTTP application with its middleware stack.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::routes())
        .layer(axum_middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}
