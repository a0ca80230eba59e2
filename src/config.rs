//! Runtime configuration.
//!
//! Decides where the database lives. The connection string comes from the
//! `--database` flag, then `POMODOKO_DATABASE`, then `DB_NAME`; relative
//! paths are resolved against the data directory (`POMODOKO_DATA_DIR`, or
//! the platform's local data directory).

use std::path::PathBuf;

use crate::storage::{DatabaseLocation, StorageError};
use crate::util::DB_NAME;

/// Environment variable overriding the connection string.
pub const DATABASE_ENV: &str = "POMODOKO_DATABASE";
/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "POMODOKO_DATA_DIR";

/// Resolved application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// `sqlite:` connection string
    pub database: String,
    /// Base directory for relative database paths
    pub data_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DB_NAME.to_string(),
            data_dir: default_data_dir(),
        }
    }
}

impl AppConfig {
    /// Builds the configuration from an optional CLI override and the
    /// process environment.
    pub fn resolve(database: Option<String>) -> Self {
        Self::resolve_with(database, |key| std::env::var(key).ok())
    }

    /// Same as `resolve`, reading variables through `env`.
    pub fn resolve_with<F>(database: Option<String>, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let database = database
            .or_else(|| env(DATABASE_ENV))
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DB_NAME.to_string());

        let data_dir = env(DATA_DIR_ENV)
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        Self { database, data_dir }
    }

    /// Resolves the connection string into a concrete location.
    pub fn location(&self) -> Result<DatabaseLocation, StorageError> {
        DatabaseLocation::parse(&self.database, &self.data_dir)
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("pomodoko"))
        .unwrap_or_else(|| PathBuf::from("."))
}
