//! User repository backed by PostgreSQL

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::utils::{classify, USER_COLUMNS};
use super::{StoreResult, UserStore};
use crate::models::{NewUser, User};

/// Repository for user database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)
    }

    async fn insert(&self, user: NewUser) -> StoreResult<User> {
        let sql = format!(
            r#"INSERT INTO users (username, password_hash, favorite_genre)
            VALUES ($1, $2, $3)
            RETURNING {}"#,
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(&user.favorite_genre)
            .fetch_one(&self.pool)
            .await
            .map_err(classify)
    }
}
