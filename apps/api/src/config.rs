//! API server configuration

use std::env;
use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use catalog_shared_config::{
    get_env_or_default, parse_env, CommonConfig, DatabaseConfig, Environment,
};

use crate::services::auth::{AuthConfig, DEFAULT_INITIAL_PASSWORD};

/// Minimum required length for JWT_SECRET to be considered secure
const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Signing secret used when none is configured outside production
const DEVELOPMENT_JWT_SECRET: &str = "development-secret-change-in-production";

/// Where catalog data lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Postgres,
    /// Process-local tables, lost on restart
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" | "" => Ok(Self::Postgres),
            "memory" | "in-memory" => Ok(Self::Memory),
            other => bail!("unknown STORE_BACKEND '{}', expected 'postgres' or 'memory'", other),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Postgres => write!(f, "postgres"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

/// API server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Common configuration shared with other services
    pub common: CommonConfig,

    /// Server port (default: 8080)
    pub port: u16,

    /// JWT secret for signing bearer tokens
    pub jwt_secret: String,

    /// Token lifetime as a duration string (default: 1h)
    pub token_expiry: String,

    /// Credential for users registered without a password
    pub initial_user_password: String,

    /// CORS allowed origins (optional)
    pub cors_allowed_origins: Option<Vec<String>>,

    /// Storage backend (default: postgres)
    pub store_backend: StoreBackend,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// In production mode, this function requires:
    /// - `JWT_SECRET`: Must be set and at least 32 characters long
    /// - `INITIAL_USER_PASSWORD`: Must be explicitly set
    /// - `DATABASE_URL`: Must be explicitly set when the store is Postgres
    ///
    /// In development/staging mode, sensible defaults are used for convenience.
    pub fn from_env() -> Result<Self> {
        let environment = Environment::from_env();
        let is_production = environment.is_production();

        let store_backend: StoreBackend = get_env_or_default("STORE_BACKEND", "postgres").parse()?;

        let jwt_secret = Self::load_jwt_secret(is_production)?;
        let initial_user_password = Self::load_initial_password(is_production)?;

        if is_production && store_backend == StoreBackend::Postgres {
            Self::validate_database_url()?;
        }

        let common = CommonConfig::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        Ok(Self {
            common,

            port: parse_env("PORT", 8080).context("Invalid PORT value")?,

            jwt_secret,

            token_expiry: get_env_or_default("TOKEN_EXPIRY", "1h"),

            initial_user_password,

            cors_allowed_origins: env::var("CORS_ORIGINS").ok().map(|s| {
                s.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            }),

            store_backend,
        })
    }

    /// Load and validate JWT_SECRET
    ///
    /// In production it must be set and at least [`MIN_JWT_SECRET_LENGTH`]
    /// characters; elsewhere a default is used with a warning.
    fn load_jwt_secret(is_production: bool) -> Result<String> {
        match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => {
                if is_production && secret.len() < MIN_JWT_SECRET_LENGTH {
                    bail!(
                        "JWT_SECRET must be at least {} characters in production (got {})",
                        MIN_JWT_SECRET_LENGTH,
                        secret.len()
                    );
                }
                Ok(secret)
            }
            _ if is_production => {
                bail!(
                    "JWT_SECRET environment variable is required in production. \
                     Please set a secure secret of at least {} characters.",
                    MIN_JWT_SECRET_LENGTH
                );
            }
            _ => {
                tracing::warn!(
                    "JWT_SECRET not set, using insecure default. \
                     This is only acceptable in development mode."
                );
                Ok(DEVELOPMENT_JWT_SECRET.to_string())
            }
        }
    }

    /// Load INITIAL_USER_PASSWORD
    ///
    /// In production it must be set; elsewhere it defaults to `secret`.
    fn load_initial_password(is_production: bool) -> Result<String> {
        match env::var("INITIAL_USER_PASSWORD") {
            Ok(password) if !password.is_empty() => Ok(password),
            _ if is_production => {
                bail!(
                    "INITIAL_USER_PASSWORD environment variable is required in production. \
                     Users created without a password receive this credential."
                );
            }
            _ => Ok(DEFAULT_INITIAL_PASSWORD.to_string()),
        }
    }

    /// Validate that DATABASE_URL is explicitly set in production
    fn validate_database_url() -> Result<()> {
        match env::var("DATABASE_URL") {
            Ok(url) if !url.is_empty() => Ok(()),
            _ => {
                bail!(
                    "DATABASE_URL environment variable is required in production. \
                     Please set your PostgreSQL connection string."
                );
            }
        }
    }

    /// Settings for the token/credential service
    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig::with_expiry_string(self.jwt_secret.clone(), &self.token_expiry)
            .with_initial_password(self.initial_user_password.clone())
    }

    /// Get database configuration
    pub fn database(&self) -> &DatabaseConfig {
        &self.common.database
    }

    /// Get environment mode
    pub fn environment(&self) -> Environment {
        self.common.environment
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.common.environment.is_production()
    }
}
