//! Store collaborators for the catalog
//!
//! Resolvers talk to persistence only through the traits in this module.
//! Two implementations exist:
//! - Postgres repositories (`BookRepository`, `AuthorRepository`, `UserRepository`)
//! - [`MemoryStore`], an in-process store with the same uniqueness rules
//!
//! Cross-request invariants (unique titles, author names and usernames) are
//! enforced by the store itself, never by application-level locks.

pub mod author;
pub mod book;
pub mod memory;
pub mod user;
pub mod utils;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Author, Book, BookFilter, NewAuthor, NewBook, NewUser, User};

pub use author::AuthorRepository;
pub use book::BookRepository;
pub use memory::MemoryStore;
pub use user::UserRepository;

/// Failure reported by a store collaborator
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write
    #[error("{field} must be unique")]
    Conflict { field: String },

    /// A shape or reference constraint rejected the write
    #[error("{0}")]
    Constraint(String),

    /// The record addressed by an update does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// No connection could be acquired in time
    #[error("store unavailable")]
    Unavailable,

    /// Any other database failure
    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl StoreError {
    pub fn conflict(field: impl Into<String>) -> Self {
        Self::Conflict {
            field: field.into(),
        }
    }

    /// Whether the caller's input caused the rejection
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::Conflict { .. } | Self::Constraint(_))
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Book collection
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn find_by_title(&self, title: &str) -> StoreResult<Option<Book>>;

    /// Books matching every criterion of the filter, in insertion order
    async fn find_by_filter(&self, filter: &BookFilter) -> StoreResult<Vec<Book>>;

    /// Persist a book; a taken title is reported as [`StoreError::Conflict`]
    async fn insert(&self, book: NewBook) -> StoreResult<Book>;

    async fn count_all(&self) -> StoreResult<i64>;

    async fn count_by_author_id(&self, author_id: Uuid) -> StoreResult<i64>;
}

/// Author collection
#[async_trait]
pub trait AuthorStore: Send + Sync {
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Author>>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Author>>;

    async fn find_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Author>>;

    async fn find_all(&self) -> StoreResult<Vec<Author>>;

    /// Create the author unless the name is taken.
    ///
    /// A taken name is reported as [`StoreError::Conflict`] and nothing is
    /// written; callers racing on the same name can re-read and proceed.
    async fn insert_if_absent(&self, author: NewAuthor) -> StoreResult<Author>;

    /// Persist the mutable fields of an existing author
    async fn update(&self, author: &Author) -> StoreResult<Author>;

    /// Delete the author unless a book references it.
    ///
    /// Returns whether a record was removed.
    async fn remove_if_unused(&self, id: Uuid) -> StoreResult<bool>;

    async fn count_all(&self) -> StoreResult<i64>;
}

/// User collection
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Persist a user, enforcing unique usernames and the minimum length
    async fn insert(&self, user: NewUser) -> StoreResult<User>;
}

/// Handles to every collection, injected into services at startup
#[derive(Clone)]
pub struct Store {
    pub books: Arc<dyn BookStore>,
    pub authors: Arc<dyn AuthorStore>,
    pub users: Arc<dyn UserStore>,
}

impl Store {
    /// Collections backed by PostgreSQL
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            books: Arc::new(BookRepository::new(pool.clone())),
            authors: Arc::new(AuthorRepository::new(pool.clone())),
            users: Arc::new(UserRepository::new(pool)),
        }
    }

    /// Collections sharing one in-memory store
    pub fn in_memory() -> Self {
        Self::from_memory(MemoryStore::new())
    }

    pub fn from_memory(store: MemoryStore) -> Self {
        let store = Arc::new(store);
        Self {
            books: store.clone(),
            authors: store.clone(),
            users: store,
        }
    }
}
