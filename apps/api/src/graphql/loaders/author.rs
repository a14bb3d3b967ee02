//! Author DataLoader for batched fetching
//!
//! Batches the author lookups of a book listing into a single store call.

use async_graphql::dataloader::Loader;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::Author;
use crate::services::CatalogService;

/// DataLoader for batching author queries
#[derive(Clone)]
pub struct AuthorLoader {
    catalog: CatalogService,
}

impl AuthorLoader {
    pub fn new(catalog: CatalogService) -> Self {
        Self { catalog }
    }
}

impl Loader<Uuid> for AuthorLoader {
    type Value = Author;
    type Error = Arc<ApiError>;

    async fn load(&self, keys: &[Uuid]) -> Result<HashMap<Uuid, Self::Value>, Self::Error> {
        let authors = self.catalog.authors_by_ids(keys).await.map_err(Arc::new)?;
        Ok(authors.into_iter().map(|a| (a.id, a)).collect())
    }
}
