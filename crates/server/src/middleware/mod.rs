//! HTTP middleware stack for the pet store API.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request span with `request_id` and `user_id` fields)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers
//!
//! Authentication is not a layer: handlers opt in with the extractors in
//! [`auth`].

pub mod auth;
pub mod request_id;
pub mod security_headers;

pub use auth::{AuthToken, RequireAdmin, RequireAuth, RequireStockManager, RequireStoreManager};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
