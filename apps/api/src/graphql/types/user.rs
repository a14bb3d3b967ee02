//! User and token GraphQL types

use async_graphql::{Object, SimpleObject, ID};

use crate::models::{AuthToken, User as DbUser};

/// Registered user
pub struct User {
    inner: DbUser,
}

impl From<DbUser> for User {
    fn from(user: DbUser) -> Self {
        Self { inner: user }
    }
}

#[Object]
impl User {
    async fn username(&self) -> &str {
        &self.inner.username
    }

    async fn favorite_genre(&self) -> &str {
        &self.inner.favorite_genre
    }

    async fn id(&self) -> ID {
        ID(self.inner.id.to_string())
    }
}

/// Bearer token returned by `login`
#[derive(Debug, Clone, SimpleObject)]
pub struct Token {
    /// Compact JWT to send as `Authorization: Bearer <value>`
    pub value: String,
}

impl From<AuthToken> for Token {
    fn from(token: AuthToken) -> Self {
        Self { value: token.value }
    }
}
