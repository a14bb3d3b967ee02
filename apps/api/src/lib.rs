//! Catalog API library
//!
//! Exposes the API components to the binary and to integration tests.

pub mod config;
pub mod error;
pub mod graphql;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use services::{AuthConfig, AuthService, CatalogService};
