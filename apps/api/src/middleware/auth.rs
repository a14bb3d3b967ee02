//! Request-scoped authentication context
//!
//! Every GraphQL request gets an [`AuthContext`] built from its
//! `Authorization` header before any resolver runs:
//! - no header, or not `Bearer <token>` → anonymous
//! - token fails verification → the request is rejected (401)
//! - token valid but the user no longer exists → anonymous
//!
//! # Usage
//!
//! ```rust,ignore
//! async fn handler(auth: AuthContext) -> impl IntoResponse {
//!     match auth.current_user() {
//!         Some(user) => format!("Hello, {}!", user.username),
//!         None => "Hello, guest!".to_string(),
//!     }
//! }
//! ```

use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use crate::error::{ApiError, ApiResult};
use crate::models::User;
use crate::repositories::UserStore;
use crate::services::AuthService;

/// Authentication state of one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthContext {
    current_user: Option<User>,
}

impl AuthContext {
    pub const fn anonymous() -> Self {
        Self { current_user: None }
    }

    pub fn authenticated(user: User) -> Self {
        Self {
            current_user: Some(user),
        }
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    /// The current user, or an authentication error for anonymous requests
    pub fn require_user(&self) -> ApiResult<&User> {
        self.current_user
            .as_ref()
            .ok_or_else(ApiError::not_authenticated)
    }
}

/// Parse an `Authorization` value of the form `Bearer <token>`
///
/// The scheme is matched case-insensitively; anything else yields `None`.
pub fn parse_bearer(value: &str) -> Option<&str> {
    let mut parts = value.split_whitespace();
    let scheme = parts.next()?;
    let token = parts.next()?;

    // Reject malformed values like "Bearer <token> <extra>"
    if parts.next().is_some() {
        return None;
    }

    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

/// Extract the bearer token from the Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_bearer)
}

/// Builds the [`AuthContext`] for incoming requests
#[derive(Clone)]
pub struct AuthContextBuilder {
    auth: AuthService,
    users: Arc<dyn UserStore>,
}

impl AuthContextBuilder {
    pub fn new(auth: AuthService, users: Arc<dyn UserStore>) -> Self {
        Self { auth, users }
    }

    /// Build a context from the raw `Authorization` header value
    pub async fn build(&self, authorization: Option<&str>) -> ApiResult<AuthContext> {
        let Some(token) = authorization.and_then(parse_bearer) else {
            return Ok(AuthContext::anonymous());
        };

        let identity = self.auth.verify(token).map_err(|_| {
            tracing::debug!("Rejecting request with unverifiable bearer token");
            ApiError::Authentication("invalid or expired token".to_string())
        })?;

        match self.users.find_by_id(identity.id).await? {
            Some(user) => {
                tracing::debug!(user_id = %user.id, "Request authenticated");
                Ok(AuthContext::authenticated(user))
            }
            None => {
                tracing::debug!(user_id = %identity.id, "Token user no longer exists");
                Ok(AuthContext::anonymous())
            }
        }
    }

    pub async fn from_headers(&self, headers: &HeaderMap) -> ApiResult<AuthContext> {
        let value = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
        self.build(value).await
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let builder = parts
            .extensions
            .get::<AuthContextBuilder>()
            .cloned()
            .ok_or_else(|| {
                ApiError::Configuration("AuthContextBuilder not in request extensions".to_string())
            })?;

        builder.from_headers(&parts.headers).await
    }
}
