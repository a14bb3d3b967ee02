//! Book model for the catalog
//!
//! Books reference their author by id. Filtering is expressed as a
//! [`BookFilter`] whose criteria always compose with AND.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Book record from the books table
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Book {
    /// Unique book identifier
    pub id: Uuid,

    /// Title (unique across the catalog)
    pub title: String,

    /// Publication year
    pub published: i32,

    /// Author of the book
    pub author_id: Uuid,

    /// Genre tags, in the order they were given
    pub genres: Vec<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Book creation input, with the author already resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub published: i32,
    pub author_id: Uuid,
    pub genres: Vec<String>,
}

/// Arguments of the `addBook` mutation
///
/// Serialized as-is into `invalidArgs` when the write is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddBook {
    pub title: String,
    pub published: i32,
    pub author: String,
    pub genres: Vec<String>,
}

impl AddBook {
    /// Build the persisted form once the author is known
    pub fn into_new_book(self, author_id: Uuid) -> NewBook {
        NewBook {
            title: self.title,
            published: self.published,
            author_id,
            genres: self.genres,
        }
    }
}

/// Criteria for listing books
///
/// Every provided criterion must hold; an empty filter matches all books.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    /// Exact author name
    pub author: Option<String>,
    /// Genre the book must be tagged with
    pub genre: Option<String>,
}

impl BookFilter {
    /// Build a filter from optional arguments, treating empty strings as absent
    pub fn new(author: Option<String>, genre: Option<String>) -> Self {
        Self {
            author: author.filter(|a| !a.is_empty()),
            genre: genre.filter(|g| !g.is_empty()),
        }
    }

    /// Whether no criteria are set
    pub fn is_empty(&self) -> bool {
        self.author.is_none() && self.genre.is_none()
    }

    /// Check a book against the filter given its author's name
    pub fn matches(&self, book: &Book, author_name: &str) -> bool {
        let author_ok = self.author.as_deref().map_or(true, |a| a == author_name);
        let genre_ok = self
            .genre
            .as_deref()
            .map_or(true, |g| book.genres.iter().any(|bg| bg == g));
        author_ok && genre_ok
    }
}
