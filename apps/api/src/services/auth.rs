//! Credential and token service
//!
//! - Issues HS256 JWTs carrying `{username, id, iat, exp}`
//! - Verifies tokens, rejecting bad signatures, malformed payloads and expiry
//! - Logs users in against their Argon2id credential hash
//! - Registers users, deriving the credential hash at creation time

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::json;

use crate::error::{ApiError, ApiResult};
use crate::models::{AuthToken, Claims, Identity, NewUser, User};
use crate::repositories::UserStore;

/// Default token lifetime (1 hour)
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

/// Password used for accounts registered without one
pub const DEFAULT_INITIAL_PASSWORD: &str = "secret";

/// Authentication service configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// Token TTL in seconds
    pub token_ttl_secs: i64,
    /// Credential given to users registered without a password
    pub initial_password: String,
}

impl AuthConfig {
    /// Create a new AuthConfig with the default TTL and initial password
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            initial_password: DEFAULT_INITIAL_PASSWORD.to_string(),
        }
    }

    /// Create AuthConfig from an expiry string (e.g., "15m", "1h")
    pub fn with_expiry_string(jwt_secret: impl Into<String>, expiry: &str) -> Self {
        Self {
            token_ttl_secs: parse_duration_string(expiry).unwrap_or(DEFAULT_TOKEN_TTL_SECS),
            ..Self::new(jwt_secret)
        }
    }

    pub fn with_initial_password(mut self, password: impl Into<String>) -> Self {
        self.initial_password = password.into();
        self
    }
}

/// Parse duration strings like "15m", "7d", "24h" to seconds
pub fn parse_duration_string(s: &str) -> Option<i64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let (idx, unit) = s.char_indices().last()?;
    let num: i64 = s[..idx].parse().ok()?;
    if num <= 0 {
        return None;
    }

    let multiplier = match unit {
        's' => 1,
        'm' => 60,
        'h' => 3600,
        'd' => 24 * 3600,
        'w' => 7 * 24 * 3600,
        _ => return None,
    };
    num.checked_mul(multiplier)
}

/// Token issuance, verification, login and registration
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    config: AuthConfig,
    argon2: Argon2<'static>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    /// Verified in place of a real hash when the username is unknown, so
    /// login timing does not reveal which usernames exist.
    dummy_password_hash: String,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(users: Arc<dyn UserStore>, config: AuthConfig) -> ApiResult<Self> {
        let argon2 = Argon2::default();

        let dummy_salt = SaltString::generate(&mut OsRng);
        let dummy_password_hash = argon2
            .hash_password(b"dummy_password_for_timing_attack_prevention", &dummy_salt)
            .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))?
            .to_string();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Ok(Self {
            users,
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            config,
            argon2,
            validation,
            dummy_password_hash,
        })
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Sign a token for an identity, issued now
    pub fn issue(&self, identity: &Identity) -> ApiResult<AuthToken> {
        self.issue_at(identity, Utc::now())
    }

    /// Sign a token for an identity as if issued at `issued_at`
    ///
    /// The same identity and instant always produce the same token.
    pub fn issue_at(&self, identity: &Identity, issued_at: DateTime<Utc>) -> ApiResult<AuthToken> {
        let claims = Claims::new(identity, issued_at, self.config.token_ttl_secs);
        let value = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(AuthToken::new(value, &claims))
    }

    /// Verify a token and recover the identity it was issued for
    pub fn verify(&self, token: &str) -> ApiResult<Identity> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                tracing::debug!(error = %e, "Token verification failed");
                ApiError::InvalidToken
            })?;

        Ok(token_data.claims.into_identity())
    }

    /// Check a username/password pair and issue a token on success
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<AuthToken> {
        let user = self.users.find_by_username(username).await?;

        // A hash is verified on every path so both failures take the same time.
        let user = match user {
            Some(u) if self.verify_password(password, &u.password_hash)? => u,
            Some(_) => {
                tracing::warn!(username = %username, "Login failed: invalid password");
                return Err(ApiError::InvalidCredentials);
            }
            None => {
                let _ = self.verify_password(password, &self.dummy_password_hash);
                tracing::warn!(username = %username, "Login failed: user not found");
                return Err(ApiError::InvalidCredentials);
            }
        };

        let token = self.issue(&user.identity())?;
        tracing::info!(user_id = %user.id, username = %user.username, "User logged in");
        Ok(token)
    }

    /// Register a user
    ///
    /// Without a password the configured initial password becomes the
    /// credential. Duplicate or too-short usernames are validation errors.
    pub async fn create_user(
        &self,
        username: &str,
        favorite_genre: &str,
        password: Option<&str>,
    ) -> ApiResult<User> {
        let password = password.unwrap_or(self.config.initial_password.as_str());
        let password_hash = self.hash_password(password)?;

        let new_user = NewUser {
            username: username.to_string(),
            password_hash,
            favorite_genre: favorite_genre.to_string(),
        };

        let user = self.users.insert(new_user).await.map_err(|e| {
            if e.is_input_error() {
                ApiError::validation(
                    e.to_string(),
                    &json!({ "username": username, "favoriteGenre": favorite_genre }),
                )
            } else {
                e.into()
            }
        })?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Hash a password with Argon2id
    fn hash_password(&self, password: &str) -> ApiResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))?;
        Ok(hash.to_string())
    }

    /// Verify a password against an Argon2id hash
    fn verify_password(&self, password: &str, hash: &str) -> ApiResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| ApiError::Internal(format!("Invalid password hash format: {}", e)))?;

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}
