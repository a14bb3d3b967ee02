//! Catalog queries
//!
//! - authorCount / bookCount: exact counts, read on every request
//! - allBooks: books filtered by author name and/or genre (criteria AND together)
//! - allAuthors: every author

use async_graphql::{Context, ErrorExtensions, Object, Result};

use crate::graphql::count_to_int;
use crate::graphql::types::{Author, Book};
use crate::models::BookFilter;
use crate::services::CatalogService;

/// Catalog read queries
#[derive(Default)]
pub struct CatalogQuery;

#[Object]
impl CatalogQuery {
    /// Number of authors in the catalog
    async fn author_count(&self, ctx: &Context<'_>) -> Result<i32> {
        let catalog = ctx.data::<CatalogService>()?;
        let count = catalog.author_count().await.map_err(|e| e.extend())?;
        count_to_int(count).map_err(|e| e.extend())
    }

    /// Number of books in the catalog
    async fn book_count(&self, ctx: &Context<'_>) -> Result<i32> {
        let catalog = ctx.data::<CatalogService>()?;
        let count = catalog.book_count().await.map_err(|e| e.extend())?;
        count_to_int(count).map_err(|e| e.extend())
    }

    /// Books, optionally restricted to an author and/or a genre
    ///
    /// When both arguments are given only books satisfying both are returned.
    async fn all_books(
        &self,
        ctx: &Context<'_>,
        author: Option<String>,
        genre: Option<String>,
    ) -> Result<Vec<Book>> {
        let catalog = ctx.data::<CatalogService>()?;
        let filter = BookFilter::new(author, genre);
        let books = catalog.all_books(&filter).await.map_err(|e| e.extend())?;
        Ok(books.into_iter().map(Book::from).collect())
    }

    /// All authors
    async fn all_authors(&self, ctx: &Context<'_>) -> Result<Vec<Author>> {
        let catalog = ctx.data::<CatalogService>()?;
        let authors = catalog.all_authors().await.map_err(|e| e.extend())?;
        Ok(authors.into_iter().map(Author::from).collect())
    }
}
