//! Catalog mutations
//!
//! Both require an authenticated user:
//! - addBook: adds a book, creating its author on first mention
//! - editAuthor: sets an author's birth year; unknown authors yield null

use async_graphql::{Context, ErrorExtensions, Object, Result};

use crate::graphql::request_auth;
use crate::graphql::types::{Author, Book};
use crate::models::AddBook;
use crate::services::CatalogService;

/// Catalog write mutations
#[derive(Default)]
pub struct CatalogMutation;

#[Object]
impl CatalogMutation {
    /// Add a book to the catalog
    ///
    /// # Errors
    /// - `UNAUTHENTICATED` without a current user
    /// - `DUPLICATE_TITLE` if the title is taken
    /// - `BAD_USER_INPUT` if the store rejects the arguments
    async fn add_book(
        &self,
        ctx: &Context<'_>,
        title: String,
        published: i32,
        author: String,
        genres: Option<Vec<Option<String>>>,
    ) -> Result<Option<Book>> {
        let catalog = ctx.data::<CatalogService>()?;
        let args = AddBook {
            title,
            published,
            author,
            genres: genres.unwrap_or_default().into_iter().flatten().collect(),
        };

        let book = catalog
            .add_book(request_auth(ctx), args)
            .await
            .map_err(|e| e.extend())?;
        Ok(Some(Book::from(book)))
    }

    /// Set the birth year of an existing author
    async fn edit_author(
        &self,
        ctx: &Context<'_>,
        name: String,
        set_born_to: Option<i32>,
    ) -> Result<Option<Author>> {
        let catalog = ctx.data::<CatalogService>()?;
        let author = catalog
            .edit_author(request_auth(ctx), &name, set_born_to)
            .await
            .map_err(|e| e.extend())?;
        Ok(author.map(Author::from))
    }
}
