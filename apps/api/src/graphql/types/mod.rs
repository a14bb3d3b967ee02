//! GraphQL type definitions for the catalog

mod author;
mod book;
mod user;

pub use author::Author;
pub use book::Book;
pub use user::{Token, User};
