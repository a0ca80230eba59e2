//! Pomodoko Library
//!
//! Core of a Pomodoro focus timer with a lightweight task list:
//! - Type definitions for timer phases, cycles, preferences and tasks
//! - Observable in-memory task list
//! - Display formatting helpers and default constants
//! - SQLite persistence for tasks and preferences
//! - Timer engine advancing pomodoro and rest phases
//! - CLI command parsing and display utilities

pub mod cli;
pub mod config;
pub mod state;
pub mod storage;
pub mod timer;
pub mod types;
pub mod util;

// Re-export commonly used types for convenience
pub use config::AppConfig;
pub use state::TasksObject;
pub use storage::{Database, DatabaseLocation, StorageError};
pub use timer::{TimerEngine, TimerError, TimerEvent, TimerOptions};
pub use types::{Cycle, Position, PreferencesError, State, Status, Task, UserPreferences};
pub use util::{
    checked_seconds, format_clock, format_minutes, format_seconds, FormatError, DB_NAME,
    DEFAULT_TASK_NAME, LONG_REST_DEFAULT, NOTIFICATION_SUCCESS, POMODORO_DEFAULT,
    SHORT_REST_DEFAULT,
};
