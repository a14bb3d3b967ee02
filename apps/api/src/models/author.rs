//! Author model for the catalog

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Author record from the authors table
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Author {
    /// Unique author identifier
    pub id: Uuid,

    /// Author name (unique across the catalog)
    pub name: String,

    /// Birth year, if known
    pub born: Option<i32>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Author creation input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAuthor {
    pub name: String,
    pub born: Option<i32>,
}

impl NewAuthor {
    /// An author known only by name, as created by find-or-create
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            born: None,
        }
    }
}
