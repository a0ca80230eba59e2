//! Storage error types.

use thiserror::Error;

use crate::types::PreferencesError;

/// Errors that can occur while reading or writing the database.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The connection string is not a `sqlite:` URL.
    #[error("invalid database connection string: {0}")]
    InvalidConnectionString(String),

    /// The directory holding the database file could not be created.
    #[error("failed to prepare database directory: {0}")]
    Io(#[from] std::io::Error),

    /// The underlying SQLite call failed.
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// No task exists with the given id.
    #[error("task not found: {0}")]
    TaskNotFound(i64),

    /// Preferences failed validation before being written.
    #[error(transparent)]
    InvalidPreferences(#[from] PreferencesError),
}

impl StorageError {
    /// Returns true if the error refers to a missing record.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TaskNotFound(_))
    }
}
