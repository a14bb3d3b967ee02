//! Error handling for the catalog API
//!
//! One error type covers the whole request path. It maps onto HTTP through
//! Axum's `IntoResponse` (for failures that happen before any resolver runs)
//! and onto GraphQL errors through `ErrorExtensions`, which attach a stable
//! `code`, a `retryable` flag and, for rejected input, the offending
//! arguments as `invalidArgs`.

use async_graphql::ErrorExtensions;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::repositories::StoreError;

/// Message shown to clients in place of internal failure details
const GENERIC_SERVER_MESSAGE: &str = "An unexpected error occurred";

/// API error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for client-side handling
    pub code: &'static str,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Main API error type
#[derive(Error, Debug)]
pub enum ApiError {
    // ========== Authentication ==========
    /// No valid current user where one is required, or an unusable bearer token
    #[error("{0}")]
    Authentication(String),

    /// Token signature, payload or expiry check failed
    #[error("invalid or expired token")]
    InvalidToken,

    /// Unknown username or wrong password
    #[error("invalid credentials")]
    InvalidCredentials,

    // ========== Validation ==========
    /// Uniqueness or shape violation on a write
    #[error("{message}")]
    Validation {
        message: String,
        invalid_args: serde_json::Value,
    },

    /// A book with this title is already in the catalog
    #[error("title must be unique: {title}")]
    DuplicateTitle { title: String },

    // ========== Database ==========
    /// Database query failed
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// No database connection available
    #[error("database connection unavailable")]
    DatabaseUnavailable,

    /// Store failure with no more specific mapping
    #[error("store error: {0}")]
    Store(String),

    // ========== Configuration & Internal ==========
    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal server error (catch-all for unexpected errors)
    #[error("internal server error: {0}")]
    Internal(String),

    /// JSON serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// JWT encoding error
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

impl ApiError {
    /// Create a validation error carrying the rejected arguments
    pub fn validation(message: impl Into<String>, args: &impl Serialize) -> Self {
        Self::Validation {
            message: message.into(),
            invalid_args: serde_json::to_value(args).unwrap_or(serde_json::Value::Null),
        }
    }

    pub fn not_authenticated() -> Self {
        Self::Authentication("not authenticated".to_string())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 401 Unauthorized
            Self::Authentication(_) | Self::InvalidToken | Self::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }

            // 400 Bad Request
            Self::Validation { .. } | Self::DuplicateTitle { .. } => StatusCode::BAD_REQUEST,

            // 503 Service Unavailable
            Self::DatabaseUnavailable => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::Database(_)
            | Self::Store(_)
            | Self::Configuration(_)
            | Self::Internal(_)
            | Self::Serialization(_)
            | Self::Jwt(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code string for client-side handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Authentication(_) => "UNAUTHENTICATED",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Validation { .. } => "BAD_USER_INPUT",
            Self::DuplicateTitle { .. } => "DUPLICATE_TITLE",
            Self::Database(_) => "DATABASE_ERROR",
            Self::DatabaseUnavailable => "DATABASE_UNAVAILABLE",
            Self::Store(_) => "STORE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Jwt(_) => "JWT_ERROR",
        }
    }

    /// Whether the error is a rejected write caused by the caller's input
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::DuplicateTitle { .. })
    }

    /// Whether repeating the same request may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::DatabaseUnavailable)
    }

    /// Arguments to echo back to the client for rejected input
    pub fn invalid_args(&self) -> Option<serde_json::Value> {
        match self {
            Self::Validation { invalid_args, .. } => Some(invalid_args.clone()),
            Self::DuplicateTitle { title } => Some(serde_json::json!({ "title": title })),
            _ => None,
        }
    }

    /// Message safe to show to clients
    pub fn public_message(&self) -> String {
        if self.status_code().is_server_error() {
            GENERIC_SERVER_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }

    /// Log the error with appropriate severity based on status code
    pub fn log(&self) {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(
                error = %self,
                code = self.error_code(),
                status = status.as_u16(),
                "Server error occurred"
            );
        } else if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(
                error = %self,
                code = self.error_code(),
                status = status.as_u16(),
                "Authentication error"
            );
        } else {
            tracing::debug!(
                error = %self,
                code = self.error_code(),
                status = status.as_u16(),
                "Client error"
            );
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();

        let status = self.status_code();
        let error_response = ErrorResponse {
            code: self.error_code(),
            message: self.public_message(),
            details: self.invalid_args(),
        };

        (status, Json(error_response)).into_response()
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> async_graphql::Error {
        self.log();

        let code = self.error_code();
        let retryable = self.is_retryable();
        let invalid_args = self
            .invalid_args()
            .and_then(|args| async_graphql::Value::from_json(args).ok());

        async_graphql::Error::new(self.public_message()).extend_with(|_, e| {
            e.set("code", code);
            e.set("retryable", retryable);
            if let Some(args) = invalid_args {
                e.set("invalidArgs", args);
            }
        })
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

// ========== Conversion Implementations ==========

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { .. } | StoreError::Constraint(_) => Self::Validation {
                message: err.to_string(),
                invalid_args: serde_json::Value::Null,
            },
            StoreError::Unavailable => Self::DatabaseUnavailable,
            StoreError::Database(e) => Self::Database(e),
            StoreError::NotFound(_) => Self::Store(err.to_string()),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<ApiError>() {
            Ok(api_err) => api_err,
            Err(err) => Self::Internal(err.to_string()),
        }
    }
}
