//! Book repository backed by PostgreSQL

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::utils::{classify, BOOK_COLUMNS};
use super::{BookStore, StoreResult};
use crate::models::{Book, BookFilter, NewBook};

/// Repository for book database operations
#[derive(Clone)]
pub struct BookRepository {
    pool: PgPool,
}

impl BookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build the listing query for a filter; each criterion adds an AND clause
    fn filter_query(filter: &BookFilter) -> QueryBuilder<'_, Postgres> {
        let mut qb = QueryBuilder::new(format!("SELECT {} FROM books WHERE TRUE", BOOK_COLUMNS));

        if let Some(author) = &filter.author {
            qb.push(" AND author_id IN (SELECT id FROM authors WHERE name = ")
                .push_bind(author)
                .push(")");
        }
        if let Some(genre) = &filter.genre {
            qb.push(" AND ").push_bind(genre).push(" = ANY(genres)");
        }

        qb.push(" ORDER BY created_at ASC, title ASC");
        qb
    }
}

#[async_trait]
impl BookStore for BookRepository {
    async fn find_by_title(&self, title: &str) -> StoreResult<Option<Book>> {
        let sql = format!("SELECT {} FROM books WHERE title = $1", BOOK_COLUMNS);
        sqlx::query_as::<_, Book>(&sql)
            .bind(title)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)
    }

    async fn find_by_filter(&self, filter: &BookFilter) -> StoreResult<Vec<Book>> {
        Self::filter_query(filter)
            .build_query_as::<Book>()
            .fetch_all(&self.pool)
            .await
            .map_err(classify)
    }

    async fn insert(&self, book: NewBook) -> StoreResult<Book> {
        let sql = format!(
            r#"INSERT INTO books (title, published, author_id, genres)
            VALUES ($1, $2, $3, $4)
            RETURNING {}"#,
            BOOK_COLUMNS
        );
        sqlx::query_as::<_, Book>(&sql)
            .bind(&book.title)
            .bind(book.published)
            .bind(book.author_id)
            .bind(&book.genres)
            .fetch_one(&self.pool)
            .await
            .map_err(classify)
    }

    async fn count_all(&self) -> StoreResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await
            .map_err(classify)
    }

    async fn count_by_author_id(&self, author_id: Uuid) -> StoreResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE author_id = $1")
            .bind(author_id)
            .fetch_one(&self.pool)
            .await
            .map_err(classify)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_query_without_criteria() {
        let filter = BookFilter::default();
        let qb = BookRepository::filter_query(&filter);
        let sql = qb.sql();
        assert!(sql.contains("WHERE TRUE ORDER BY"));
        assert!(!sql.contains("ANY(genres)"));
    }

    #[test]
    fn test_filter_query_combines_criteria_with_and() {
        let filter = BookFilter::new(Some("Robert Martin".into()), Some("refactoring".into()));
        let qb = BookRepository::filter_query(&filter);
        let sql = qb.sql();
        assert!(sql.contains("AND author_id IN (SELECT id FROM authors WHERE name = $1)"));
        assert!(sql.contains("AND $2 = ANY(genres)"));
    }

    #[test]
    fn test_filter_query_genre_only() {
        let filter = BookFilter::new(None, Some("crime".into()));
        let qb = BookRepository::filter_query(&filter);
        let sql = qb.sql();
        assert!(sql.contains("AND $1 = ANY(genres)"));
        assert!(!sql.contains("authors"));
    }
}
