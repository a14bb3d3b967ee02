//! Author GraphQL type

use async_graphql::{Context, ErrorExtensions, Object, Result, ID};

use crate::graphql::count_to_int;
use crate::models::Author as DbAuthor;
use crate::services::CatalogService;

/// Author in the catalog
pub struct Author {
    inner: DbAuthor,
}

impl Author {
    pub fn new(author: DbAuthor) -> Self {
        Self { inner: author }
    }
}

impl From<DbAuthor> for Author {
    fn from(author: DbAuthor) -> Self {
        Self::new(author)
    }
}

#[Object]
impl Author {
    /// Author name, unique across the catalog
    async fn name(&self) -> &str {
        &self.inner.name
    }

    async fn id(&self) -> ID {
        ID(self.inner.id.to_string())
    }

    /// Birth year, if known
    async fn born(&self) -> Option<i32> {
        self.inner.born
    }

    /// Number of books by this author (COUNT query per author)
    async fn book_count(&self, ctx: &Context<'_>) -> Result<i32> {
        let catalog = ctx.data::<CatalogService>()?;
        let count = catalog
            .book_count_for(self.inner.id)
            .await
            .map_err(|e| e.extend())?;
        count_to_int(count).map_err(|e| e.extend())
    }
}
