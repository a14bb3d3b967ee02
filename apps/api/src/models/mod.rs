//! Database models and types for the catalog
//!
//! This module contains SQLx models for:
//! - Authors and books
//! - Users, token claims and issued tokens

pub mod author;
pub mod book;
pub mod user;

pub use author::{Author, NewAuthor};
pub use book::{AddBook, Book, BookFilter, NewBook};
pub use user::{AuthToken, Claims, Identity, NewUser, User, MIN_USERNAME_LENGTH};
