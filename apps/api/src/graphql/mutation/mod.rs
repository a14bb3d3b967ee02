//! GraphQL mutations for the catalog

mod auth;
mod catalog;

pub use auth::AuthMutation;
pub use catalog::CatalogMutation;

use async_graphql::MergedObject;

/// Root mutation type combining all mutation domains
#[derive(MergedObject, Default)]
pub struct Mutation(CatalogMutation, AuthMutation);
