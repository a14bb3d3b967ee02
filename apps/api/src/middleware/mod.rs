//! Middleware components for the catalog API
//!
//! - `AuthContext`: per-request authentication context, extracted in handlers
//! - `AuthContextBuilder`: turns an `Authorization` header into an `AuthContext`

pub mod auth;

pub use auth::{extract_bearer_token, AuthContext, AuthContextBuilder};
