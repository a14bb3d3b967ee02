//! GraphQL schema builder for the catalog

use async_graphql::dataloader::DataLoader;
use async_graphql::{EmptySubscription, Schema};

use crate::error::{ApiError, ApiResult};
use crate::services::{AuthService, CatalogService};

use super::loaders::AuthorLoader;
use super::mutation::Mutation;
use super::query::Query;

/// The catalog GraphQL schema type
pub type CatalogSchema = Schema<Query, Mutation, EmptySubscription>;

/// Builder for constructing the GraphQL schema with required services
#[derive(Default)]
pub struct SchemaBuilder {
    catalog: Option<CatalogService>,
    auth_service: Option<AuthService>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the catalog service
    pub fn catalog(mut self, catalog: CatalogService) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Set the auth service
    pub fn auth_service(mut self, auth_service: AuthService) -> Self {
        self.auth_service = Some(auth_service);
        self
    }

    /// Build the schema with all configured services
    pub fn build(self) -> ApiResult<CatalogSchema> {
        let catalog = self
            .catalog
            .ok_or_else(|| ApiError::Configuration("catalog service is required".to_string()))?;
        let auth_service = self
            .auth_service
            .ok_or_else(|| ApiError::Configuration("auth service is required".to_string()))?;

        Ok(build_schema(catalog, auth_service))
    }
}

/// Create the schema from its two services
pub fn build_schema(catalog: CatalogService, auth_service: AuthService) -> CatalogSchema {
    let author_loader = DataLoader::new(AuthorLoader::new(catalog.clone()), tokio::spawn);

    Schema::build(Query::default(), Mutation::default(), EmptySubscription)
        .data(catalog)
        .data(auth_service)
        .data(author_loader)
        .finish()
}
