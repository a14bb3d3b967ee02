//! In-process store implementing every collaborator trait
//!
//! All collections live behind a single lock so that check-then-write
//! sequences (uniqueness, foreign keys) are atomic, mirroring the guarantees
//! the Postgres constraints give the SQL repositories.
//!
//! Locks are acquired with `unwrap_or_else(|e| e.into_inner())`: a panic while
//! holding the lock must not wedge every later request.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{AuthorStore, BookStore, StoreError, StoreResult, UserStore};
use crate::models::{
    Author, Book, BookFilter, NewAuthor, NewBook, NewUser, User, MIN_USERNAME_LENGTH,
};

#[derive(Default)]
struct Tables {
    authors: Vec<Author>,
    books: Vec<Book>,
    users: Vec<User>,
}

impl Tables {
    fn author(&self, id: Uuid) -> Option<&Author> {
        self.authors.iter().find(|a| a.id == id)
    }
}

/// Memory-backed catalog store
///
/// Clones share the same underlying tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> T {
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        f(&tables)
    }

    fn write<T>(&self, f: impl FnOnce(&mut Tables) -> T) -> T {
        let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
        f(&mut tables)
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn find_by_title(&self, title: &str) -> StoreResult<Option<Book>> {
        Ok(self.read(|t| t.books.iter().find(|b| b.title == title).cloned()))
    }

    async fn find_by_filter(&self, filter: &BookFilter) -> StoreResult<Vec<Book>> {
        Ok(self.read(|t| {
            t.books
                .iter()
                .filter(|book| {
                    let author_name = t.author(book.author_id).map_or("", |a| a.name.as_str());
                    filter.matches(book, author_name)
                })
                .cloned()
                .collect()
        }))
    }

    async fn insert(&self, book: NewBook) -> StoreResult<Book> {
        self.write(|t| {
            if book.title.is_empty() {
                return Err(StoreError::Constraint("title must not be empty".to_string()));
            }
            if t.books.iter().any(|b| b.title == book.title) {
                return Err(StoreError::conflict("title"));
            }
            if t.author(book.author_id).is_none() {
                return Err(StoreError::Constraint(
                    "referenced record does not exist".to_string(),
                ));
            }

            let record = Book {
                id: Uuid::new_v4(),
                title: book.title,
                published: book.published,
                author_id: book.author_id,
                genres: book.genres,
                created_at: Utc::now(),
            };
            t.books.push(record.clone());
            Ok(record)
        })
    }

    async fn count_all(&self) -> StoreResult<i64> {
        Ok(self.read(|t| t.books.len() as i64))
    }

    async fn count_by_author_id(&self, author_id: Uuid) -> StoreResult<i64> {
        Ok(self.read(|t| t.books.iter().filter(|b| b.author_id == author_id).count() as i64))
    }
}

#[async_trait]
impl AuthorStore for MemoryStore {
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Author>> {
        Ok(self.read(|t| t.authors.iter().find(|a| a.name == name).cloned()))
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Author>> {
        Ok(self.read(|t| t.author(id).cloned()))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Author>> {
        Ok(self.read(|t| {
            t.authors
                .iter()
                .filter(|a| ids.contains(&a.id))
                .cloned()
                .collect()
        }))
    }

    async fn find_all(&self) -> StoreResult<Vec<Author>> {
        Ok(self.read(|t| t.authors.clone()))
    }

    async fn insert_if_absent(&self, author: NewAuthor) -> StoreResult<Author> {
        self.write(|t| {
            if author.name.is_empty() {
                return Err(StoreError::Constraint(
                    "author name must not be empty".to_string(),
                ));
            }
            if t.authors.iter().any(|a| a.name == author.name) {
                return Err(StoreError::conflict("name"));
            }

            let now = Utc::now();
            let record = Author {
                id: Uuid::new_v4(),
                name: author.name,
                born: author.born,
                created_at: now,
                updated_at: now,
            };
            t.authors.push(record.clone());
            Ok(record)
        })
    }

    async fn update(&self, author: &Author) -> StoreResult<Author> {
        self.write(|t| {
            let stored = t
                .authors
                .iter_mut()
                .find(|a| a.id == author.id)
                .ok_or(StoreError::NotFound("author"))?;
            stored.born = author.born;
            stored.updated_at = Utc::now();
            Ok(stored.clone())
        })
    }

    async fn remove_if_unused(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.write(|t| {
            if t.books.iter().any(|b| b.author_id == id) {
                return false;
            }
            let before = t.authors.len();
            t.authors.retain(|a| a.id != id);
            t.authors.len() < before
        }))
    }

    async fn count_all(&self) -> StoreResult<i64> {
        Ok(self.read(|t| t.authors.len() as i64))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(self.read(|t| t.users.iter().find(|u| u.username == username).cloned()))
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.read(|t| t.users.iter().find(|u| u.id == id).cloned()))
    }

    async fn insert(&self, user: NewUser) -> StoreResult<User> {
        self.write(|t| {
            if user.username.chars().count() < MIN_USERNAME_LENGTH {
                return Err(StoreError::Constraint(format!(
                    "username must be at least {} characters",
                    MIN_USERNAME_LENGTH
                )));
            }
            if t.users.iter().any(|u| u.username == user.username) {
                return Err(StoreError::conflict("username"));
            }

            let record = User {
                id: Uuid::new_v4(),
                username: user.username,
                password_hash: user.password_hash,
                favorite_genre: user.favorite_genre,
                created_at: Utc::now(),
            };
            t.users.push(record.clone());
            Ok(record)
        })
    }
}
