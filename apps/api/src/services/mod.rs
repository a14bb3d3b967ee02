//! Business logic services for the catalog
//!
//! - Credential and token handling (`AuthService`)
//! - Catalog reads and writes (`CatalogService`)
//! - Health checks (`HealthService`)

pub mod auth;
pub mod catalog;
pub mod health;

pub use auth::{AuthConfig, AuthService};
pub use catalog::CatalogService;
pub use health::HealthService;
