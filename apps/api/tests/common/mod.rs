//! Common test utilities for API integration tests
//!
//! Shared fixtures (an in-memory app with its services) and request helpers.

#![allow(unused_imports)]

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
