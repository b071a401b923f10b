//! HTTP middleware stack for the bookmarks API.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//!
//! Caller identity is resolved per handler by the [`CurrentCaller`] extractor.

pub mod auth;
pub mod request_id;

pub use auth::CurrentCaller;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
