//! User queries
//!
//! - me: the user the request's bearer token belongs to

use async_graphql::{Context, Object};

use crate::graphql::request_auth;
use crate::graphql::types::User;

/// User-related queries
#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    /// The authenticated user, or null for anonymous requests
    async fn me(&self, ctx: &Context<'_>) -> Option<User> {
        request_auth(ctx).current_user().cloned().map(User::from)
    }
}
