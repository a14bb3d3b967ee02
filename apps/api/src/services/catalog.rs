//! Catalog reads and writes
//!
//! Writes require an authenticated [`AuthContext`]. Uniqueness of titles and
//! author names is enforced by the store; this service only interprets the
//! conflicts it reports.

use serde_json::json;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthContext;
use crate::models::{AddBook, Author, Book, BookFilter, NewAuthor};
use crate::repositories::{Store, StoreError};

/// Insert attempts for one book when its author disappears underneath it
const MAX_ADD_ATTEMPTS: u32 = 2;

/// Catalog operations over the injected store
#[derive(Clone)]
pub struct CatalogService {
    store: Store,
}

impl CatalogService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn author_count(&self) -> ApiResult<i64> {
        Ok(self.store.authors.count_all().await?)
    }

    pub async fn book_count(&self) -> ApiResult<i64> {
        Ok(self.store.books.count_all().await?)
    }

    /// Books matching every criterion of the filter
    pub async fn all_books(&self, filter: &BookFilter) -> ApiResult<Vec<Book>> {
        Ok(self.store.books.find_by_filter(filter).await?)
    }

    pub async fn all_authors(&self) -> ApiResult<Vec<Author>> {
        Ok(self.store.authors.find_all().await?)
    }

    /// Number of books referencing the author
    pub async fn book_count_for(&self, author_id: Uuid) -> ApiResult<i64> {
        Ok(self.store.books.count_by_author_id(author_id).await?)
    }

    pub async fn authors_by_ids(&self, ids: &[Uuid]) -> ApiResult<Vec<Author>> {
        Ok(self.store.authors.find_by_ids(ids).await?)
    }

    /// Add a book, creating its author on first mention
    ///
    /// A rejected book never leaves behind an author created for it.
    pub async fn add_book(&self, auth: &AuthContext, args: AddBook) -> ApiResult<Book> {
        let user = auth.require_user()?;

        if args.title.is_empty() {
            return Err(ApiError::validation("title must not be empty", &args));
        }
        if self.store.books.find_by_title(&args.title).await?.is_some() {
            return Err(ApiError::DuplicateTitle { title: args.title });
        }

        let mut attempt = 1;
        loop {
            let (author, created) = self.find_or_create_author(&args).await?;

            let err = match self
                .store
                .books
                .insert(args.clone().into_new_book(author.id))
                .await
            {
                Ok(book) => {
                    tracing::info!(
                        book_id = %book.id,
                        title = %book.title,
                        author = %author.name,
                        user_id = %user.id,
                        "Book added"
                    );
                    return Ok(book);
                }
                Err(e) => e,
            };

            if created {
                self.discard_author(&author).await;
            } else if attempt < MAX_ADD_ATTEMPTS
                && matches!(err, StoreError::Constraint(_))
                && self.store.authors.find_by_id(author.id).await?.is_none()
            {
                // The author was discarded by a request whose own book was rejected
                tracing::debug!(name = %author.name, "Author vanished before insert, retrying");
                attempt += 1;
                continue;
            }

            return Err(match err {
                // Another request stored the same title after our check.
                StoreError::Conflict { field } if field == "title" => {
                    ApiError::DuplicateTitle { title: args.title }
                }
                e if e.is_input_error() => ApiError::validation(e.to_string(), &args),
                e => e.into(),
            });
        }
    }

    /// Look the author up by name, creating it if absent
    ///
    /// Returns the author and whether this call created it. Concurrent callers
    /// may race to create the same author; the store lets exactly one insert
    /// win and the others re-read the winner's record.
    async fn find_or_create_author(&self, args: &AddBook) -> ApiResult<(Author, bool)> {
        let authors = &self.store.authors;

        if let Some(author) = authors.find_by_name(&args.author).await? {
            return Ok((author, false));
        }

        match authors.insert_if_absent(NewAuthor::named(&args.author)).await {
            Ok(author) => {
                tracing::info!(author_id = %author.id, name = %author.name, "Author created");
                Ok((author, true))
            }
            Err(StoreError::Conflict { .. }) => {
                tracing::debug!(name = %args.author, "Author created concurrently, re-reading");
                let author = authors.find_by_name(&args.author).await?.ok_or_else(|| {
                    ApiError::Internal(format!(
                        "author '{}' conflicted but could not be read back",
                        args.author
                    ))
                })?;
                Ok((author, false))
            }
            Err(e) if e.is_input_error() => Err(ApiError::validation(e.to_string(), args)),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove an author created for a book the store then rejected
    async fn discard_author(&self, author: &Author) {
        match self.store.authors.remove_if_unused(author.id).await {
            Ok(true) => {
                tracing::debug!(author_id = %author.id, "Discarded author of rejected book")
            }
            Ok(false) => {
                tracing::debug!(author_id = %author.id, "Author kept, another book references it")
            }
            Err(e) => tracing::warn!(
                author_id = %author.id,
                error = %e,
                "Failed to discard author of rejected book"
            ),
        }
    }

    /// Set an author's birth year
    ///
    /// An unknown author is not an error: the result is `None`.
    pub async fn edit_author(
        &self,
        auth: &AuthContext,
        name: &str,
        born: Option<i32>,
    ) -> ApiResult<Option<Author>> {
        let user = auth.require_user()?;

        let Some(mut author) = self.store.authors.find_by_name(name).await? else {
            tracing::debug!(name = %name, "editAuthor on unknown author");
            return Ok(None);
        };
        author.born = born;

        match self.store.authors.update(&author).await {
            Ok(updated) => {
                tracing::info!(
                    author_id = %updated.id,
                    born = ?updated.born,
                    user_id = %user.id,
                    "Author updated"
                );
                Ok(Some(updated))
            }
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(e) if e.is_input_error() => Err(ApiError::validation(
                e.to_string(),
                &json!({ "name": name, "setBornTo": born }),
            )),
            Err(e) => Err(e.into()),
        }
    }
}
