use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::CompetitionStatus;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found")]
    NotFound,

    #[error("Competition was modified concurrently (expected version {expected}, found {actual})")]
    Conflict {
        expected: DateTime<Utc>,
        actual: DateTime<Utc>,
    },

    #[error("Transition rejected: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Changing status from {from} to {to} requires confirmation")]
    ConfirmationRequired {
        from: CompetitionStatus,
        to: CompetitionStatus,
    },

    #[error("Malformed competition record: {0}")]
    MalformedRecord(String),
}

pub type Result<T> = std::result::Result<T, LifecycleError>;

impl LifecycleError {
    /// Conflicts are resolved by re-reading and re-validating, never by retrying blindly.
    pub fn is_conflict(&self) -> bool {
        matches!(self, LifecycleError::Conflict { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LifecycleError::NotFound)
    }
}
