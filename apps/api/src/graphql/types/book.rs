//! Book GraphQL type

use async_graphql::dataloader::DataLoader;
use async_graphql::{Context, ErrorExtensions, Object, Result, ID};

use crate::error::ApiError;
use crate::graphql::loaders::AuthorLoader;
use crate::models::Book as DbBook;

use super::author::Author;

/// Book in the catalog
pub struct Book {
    inner: DbBook,
}

impl Book {
    pub fn new(book: DbBook) -> Self {
        Self { inner: book }
    }
}

impl From<DbBook> for Book {
    fn from(book: DbBook) -> Self {
        Self::new(book)
    }
}

#[Object]
impl Book {
    /// Title, unique across the catalog
    async fn title(&self) -> &str {
        &self.inner.title
    }

    /// Publication year
    async fn published(&self) -> i32 {
        self.inner.published
    }

    /// Author of the book (batched through the author DataLoader)
    async fn author(&self, ctx: &Context<'_>) -> Result<Author> {
        let loader = ctx.data::<DataLoader<AuthorLoader>>()?;
        let author = loader
            .load_one(self.inner.author_id)
            .await
            .map_err(|e| e.as_ref().extend())?;

        author.map(Author::from).ok_or_else(|| {
            ApiError::Internal(format!(
                "book {} references missing author {}",
                self.inner.id, self.inner.author_id
            ))
            .extend()
        })
    }

    /// Genre tags
    async fn genres(&self) -> &[String] {
        &self.inner.genres
    }

    async fn id(&self) -> ID {
        ID(self.inner.id.to_string())
    }
}
