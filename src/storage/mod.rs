//! SQLite persistence for tasks and preferences.
//!
//! Tasks live in the `tasks` table keyed by a database-assigned id, with the
//! layout position flattened into `position_x` / `position_y`. Preferences
//! are stored as integer rows in a small key-value table and seeded with the
//! default durations the first time the database is opened.

mod error;
pub mod migrations;

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info, warn};

pub use error::StorageError;

use crate::types::{Position, Task, UserPreferences};
use crate::util::DEFAULT_TASK_NAME;

const PREF_POMODORO: &str = "pomodoro";
const PREF_SHORT_REST: &str = "short_rest";
const PREF_LONG_REST: &str = "long_rest";

// ============================================================================
// DatabaseLocation
// ============================================================================

/// Where a connection string points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    /// A private in-memory database.
    Memory,
    /// A database file on disk.
    File(PathBuf),
}

impl DatabaseLocation {
    /// Resolves a `sqlite:` connection string.
    ///
    /// Relative paths are resolved against `data_dir`; `sqlite::memory:`
    /// selects an in-memory database.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidConnectionString` for any other scheme
    /// or an empty path.
    pub fn parse(connection: &str, data_dir: &Path) -> Result<Self, StorageError> {
        let rest = connection
            .strip_prefix("sqlite:")
            .ok_or_else(|| StorageError::InvalidConnectionString(connection.to_string()))?;
        let rest = rest.strip_prefix("//").unwrap_or(rest);

        if rest == ":memory:" {
            return Ok(Self::Memory);
        }
        if rest.is_empty() {
            return Err(StorageError::InvalidConnectionString(connection.to_string()));
        }

        let path = Path::new(rest);
        if path.is_absolute() {
            Ok(Self::File(path.to_path_buf()))
        } else {
            Ok(Self::File(data_dir.join(path)))
        }
    }
}

// ============================================================================
// Database
// ============================================================================

/// Owned connection to the application database.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (creating if needed) the database at `location`.
    ///
    /// Applies pending migrations and seeds missing preferences.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or if
    /// SQLite fails to open or migrate the file.
    pub fn open(location: &DatabaseLocation) -> Result<Self, StorageError> {
        let conn = match location {
            DatabaseLocation::Memory => Connection::open_in_memory()?,
            DatabaseLocation::File(path) => {
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent)?;
                    }
                }
                debug!(path = %path.display(), "Opening database");
                Connection::open(path)?
            }
        };

        let db = Self { conn };
        migrations::migrate(&db.conn)?;
        db.seed_preferences()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::open(&DatabaseLocation::Memory)
    }

    /// Returns the underlying connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    // ------------------------------------------------------------------------
    // Tasks
    // ------------------------------------------------------------------------

    /// Inserts a new incomplete task and returns it with its assigned id.
    pub fn insert_task(&self, name: &str, position: Position) -> Result<Task, StorageError> {
        self.conn.execute(
            "INSERT INTO tasks (name, completed, position_x, position_y) VALUES (?1, 0, ?2, ?3)",
            params![name, position.x, position.y],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(id, name, "Task created");

        Ok(Task::new(id).with_name(name).with_position(position))
    }

    /// Loads one task by id.
    pub fn load_task(&self, id: i64) -> Result<Option<Task>, StorageError> {
        let task = self
            .conn
            .query_row(
                "SELECT id, name, completed, position_x, position_y FROM tasks WHERE id = ?1",
                params![id],
                task_from_row,
            )
            .optional()?;
        Ok(task)
    }

    /// Loads every task in id order.
    pub fn list_tasks(&self) -> Result<Vec<Task>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, completed, position_x, position_y FROM tasks ORDER BY id",
        )?;
        let tasks = stmt
            .query_map([], task_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    /// Writes every field of `task` back to its row.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::TaskNotFound` if no row has the task's id.
    pub fn update_task(&self, task: &Task) -> Result<(), StorageError> {
        let changed = self.conn.execute(
            "UPDATE tasks SET name = ?2, completed = ?3, position_x = ?4, position_y = ?5
             WHERE id = ?1",
            params![
                task.id,
                task.name,
                task.completed,
                task.position.x,
                task.position.y
            ],
        )?;
        if changed == 0 {
            return Err(StorageError::TaskNotFound(task.id));
        }
        debug!(id = task.id, "Task updated");
        Ok(())
    }

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::TaskNotFound` if no row has the id.
    pub fn delete_task(&self, id: i64) -> Result<(), StorageError> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(StorageError::TaskNotFound(id));
        }
        info!(id, "Task deleted");
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Preferences
    // ------------------------------------------------------------------------

    /// Loads preferences, falling back to defaults for missing keys and for
    /// stored values that are not a positive number of seconds.
    pub fn load_preferences(&self) -> Result<UserPreferences, StorageError> {
        let defaults = UserPreferences::default();
        Ok(UserPreferences {
            pomodoro_time: self.load_preference(PREF_POMODORO, defaults.pomodoro_time)?,
            short_rest_time: self.load_preference(PREF_SHORT_REST, defaults.short_rest_time)?,
            long_rest_time: self.load_preference(PREF_LONG_REST, defaults.long_rest_time)?,
        })
    }

    /// Validates and stores all three durations.
    pub fn save_preferences(&self, prefs: &UserPreferences) -> Result<(), StorageError> {
        prefs.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        for (key, value) in preference_rows(prefs) {
            tx.execute(
                "INSERT INTO preferences (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )?;
        }
        tx.commit()?;

        info!(
            pomodoro = prefs.pomodoro_time,
            short_rest = prefs.short_rest_time,
            long_rest = prefs.long_rest_time,
            "Preferences saved"
        );
        Ok(())
    }

    fn load_preference(&self, key: &str, default: u32) -> Result<u32, StorageError> {
        let stored: Option<i64> = self
            .conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        let Some(stored) = stored else {
            return Ok(default);
        };
        match u32::try_from(stored) {
            Ok(seconds) if seconds > 0 => Ok(seconds),
            _ => {
                warn!(key, stored, default, "Stored duration out of range, using default");
                Ok(default)
            }
        }
    }

    fn seed_preferences(&self) -> Result<(), StorageError> {
        let defaults = UserPreferences::default();
        for (key, value) in preference_rows(&defaults) {
            self.conn.execute(
                "INSERT OR IGNORE INTO preferences (key, value) VALUES (?1, ?2)",
                params![key, value],
            )?;
        }
        Ok(())
    }
}

fn preference_rows(prefs: &UserPreferences) -> [(&'static str, u32); 3] {
    [
        (PREF_POMODORO, prefs.pomodoro_time),
        (PREF_SHORT_REST, prefs.short_rest_time),
        (PREF_LONG_REST, prefs.long_rest_time),
    ]
}

/// Maps a row of `id, name, completed, position_x, position_y`.
///
/// Rows written by the v1 schema may carry NULL name or completed.
fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    let name: Option<String> = row.get(1)?;
    let completed: Option<bool> = row.get(2)?;
    Ok(Task {
        id: row.get(0)?,
        name: name.unwrap_or_else(|| DEFAULT_TASK_NAME.to_string()),
        completed: completed.unwrap_or(false),
        position: Position::new(row.get(3)?, row.get(4)?),
    })
}
