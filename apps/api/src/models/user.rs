//! User and authentication models for the catalog
//!
//! This module contains:
//! - User accounts and their creation input
//! - JWT claims and the identity they carry
//! - Issued bearer tokens

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Shortest username the store accepts
pub const MIN_USERNAME_LENGTH: usize = 3;

/// User account from the users table
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,

    /// Login name (unique, at least three characters)
    pub username: String,

    /// Argon2 hashed credential
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Genre the user prefers
    pub favorite_genre: String,

    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// The identity a token issued for this user encodes
    pub fn identity(&self) -> Identity {
        Identity {
            username: self.username.clone(),
            id: self.id,
        }
    }
}

/// User creation input; the credential is already hashed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub favorite_genre: String,
}

/// Identity asserted by a bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
    pub id: Uuid,
}

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Username at issuance
    pub username: String,

    /// User ID
    pub id: Uuid,

    /// Issued at timestamp (Unix epoch)
    pub iat: i64,

    /// Expiration timestamp (Unix epoch)
    pub exp: i64,
}

impl Claims {
    /// Create claims for an identity issued at `issued_at`
    pub fn new(identity: &Identity, issued_at: DateTime<Utc>, ttl_secs: i64) -> Self {
        let iat = issued_at.timestamp();
        Self {
            username: identity.username.clone(),
            id: identity.id,
            iat,
            exp: iat.saturating_add(ttl_secs),
        }
    }

    /// Check if the token has expired at the given instant
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() > self.exp
    }

    /// Drop the timestamps, keeping who the token speaks for
    pub fn into_identity(self) -> Identity {
        Identity {
            username: self.username,
            id: self.id,
        }
    }
}

/// Signed token handed out by `login`
#[derive(Debug, Clone, Serialize)]
pub struct AuthToken {
    /// Compact JWT
    pub value: String,

    /// Expiration timestamp
    pub expires_at: DateTime<Utc>,
}

impl AuthToken {
    pub fn new(value: String, claims: &Claims) -> Self {
        Self {
            value,
            expires_at: DateTime::from_timestamp(claims.exp, 0).unwrap_or_default(),
        }
    }
}
