//! Authentication mutations
//!
//! - createUser: public registration
//! - login: exchange username and password for a bearer token

use async_graphql::{Context, ErrorExtensions, Object, Result};

use crate::graphql::types::{Token, User};
use crate::services::AuthService;

/// Registration and login
#[derive(Default)]
pub struct AuthMutation;

#[Object]
impl AuthMutation {
    /// Register a new user
    ///
    /// Without `password` the account gets the service's initial password.
    async fn create_user(
        &self,
        ctx: &Context<'_>,
        username: String,
        favorite_genre: String,
        password: Option<String>,
    ) -> Result<Option<User>> {
        let auth = ctx.data::<AuthService>()?;
        let user = auth
            .create_user(&username, &favorite_genre, password.as_deref())
            .await
            .map_err(|e| e.extend())?;
        Ok(Some(User::from(user)))
    }

    /// Log in and receive a signed token
    async fn login(
        &self,
        ctx: &Context<'_>,
        username: String,
        password: String,
    ) -> Result<Option<Token>> {
        let auth = ctx.data::<AuthService>()?;
        let token = auth
            .login(&username, &password)
            .await
            .map_err(|e| e.extend())?;
        Ok(Some(Token::from(token)))
    }
}
