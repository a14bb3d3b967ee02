//! Author repository backed by PostgreSQL

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::utils::{classify, AUTHOR_COLUMNS};
use super::{AuthorStore, StoreError, StoreResult};
use crate::models::{Author, NewAuthor};

/// Repository for author database operations
#[derive(Clone)]
pub struct AuthorRepository {
    pool: PgPool,
}

impl AuthorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorStore for AuthorRepository {
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Author>> {
        let sql = format!("SELECT {} FROM authors WHERE name = $1", AUTHOR_COLUMNS);
        sqlx::query_as::<_, Author>(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Author>> {
        let sql = format!("SELECT {} FROM authors WHERE id = $1", AUTHOR_COLUMNS);
        sqlx::query_as::<_, Author>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Author>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!("SELECT {} FROM authors WHERE id = ANY($1)", AUTHOR_COLUMNS);
        sqlx::query_as::<_, Author>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(classify)
    }

    async fn find_all(&self) -> StoreResult<Vec<Author>> {
        let sql = format!(
            "SELECT {} FROM authors ORDER BY created_at ASC, name ASC",
            AUTHOR_COLUMNS
        );
        sqlx::query_as::<_, Author>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(classify)
    }

    async fn insert_if_absent(&self, author: NewAuthor) -> StoreResult<Author> {
        // The unique index arbitrates concurrent creators; losers see no row.
        let sql = format!(
            r#"INSERT INTO authors (name, born)
            VALUES ($1, $2)
            ON CONFLICT (name) DO NOTHING
            RETURNING {}"#,
            AUTHOR_COLUMNS
        );
        sqlx::query_as::<_, Author>(&sql)
            .bind(&author.name)
            .bind(author.born)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?
            .ok_or_else(|| StoreError::conflict("name"))
    }

    async fn update(&self, author: &Author) -> StoreResult<Author> {
        let sql = format!(
            r#"UPDATE authors
            SET born = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {}"#,
            AUTHOR_COLUMNS
        );
        sqlx::query_as::<_, Author>(&sql)
            .bind(author.id)
            .bind(author.born)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?
            .ok_or(StoreError::NotFound("author"))
    }

    async fn remove_if_unused(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"DELETE FROM authors
            WHERE id = $1
              AND NOT EXISTS (SELECT 1 FROM books WHERE author_id = $1)"#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(classify);

        match result {
            Ok(done) => Ok(done.rows_affected() > 0),
            // A book referencing the author committed while we deleted
            Err(StoreError::Constraint(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn count_all(&self) -> StoreResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.pool)
            .await
            .map_err(classify)
    }
}
