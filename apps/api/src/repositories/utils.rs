//! Shared helpers for the Postgres repositories

use super::StoreError;
use crate::models::MIN_USERNAME_LENGTH;

/// SQL columns for author queries
pub const AUTHOR_COLUMNS: &str = "id, name, born, created_at, updated_at";

/// SQL columns for book queries
pub const BOOK_COLUMNS: &str = "id, title, published, author_id, genres, created_at";

/// SQL columns for user queries
pub const USER_COLUMNS: &str = "id, username, password_hash, favorite_genre, created_at";

/// Translate a driver error into the store taxonomy.
///
/// Unique violations become conflicts on the column named by the constraint
/// (`<table>_<column>_key`), check and foreign-key violations become
/// constraint errors.
pub fn classify(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => StoreError::Unavailable,
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StoreError::conflict(conflict_field(db_err.constraint()))
        }
        sqlx::Error::Database(db_err) if db_err.is_check_violation() => {
            StoreError::Constraint(check_message(db_err.constraint()))
        }
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            StoreError::Constraint("referenced record does not exist".to_string())
        }
        _ => StoreError::Database(err),
    }
}

/// Column name encoded in a `<table>_<column>_key` constraint name
pub fn conflict_field(constraint: Option<&str>) -> String {
    constraint
        .and_then(|c| c.strip_suffix("_key"))
        .and_then(|c| c.split_once('_'))
        .map(|(_, column)| column.to_string())
        .unwrap_or_else(|| "value".to_string())
}

fn check_message(constraint: Option<&str>) -> String {
    match constraint {
        Some("users_username_length_check") => {
            format!("username must be at least {} characters", MIN_USERNAME_LENGTH)
        }
        Some("books_title_not_empty_check") => "title must not be empty".to_string(),
        Some("authors_name_not_empty_check") => "author name must not be empty".to_string(),
        Some(other) => format!("constraint {} violated", other),
        None => "constraint violated".to_string(),
    }
}
