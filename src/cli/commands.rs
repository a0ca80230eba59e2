//! Command definitions for the Pomodoko CLI.
//!
//! Uses clap derive macro for argument parsing.

use clap::{Args, Parser, Subcommand};

// ============================================================================
// CLI Structure
// ============================================================================

/// Pomodoko - focus timer and task list
#[derive(Parser, Debug)]
#[command(
    name = "pomodoko",
    version,
    about = "Pomodoro focus timer with a lightweight task list",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Database connection string (e.g. sqlite:pomodoko.db)
    #[arg(long, global = true, value_name = "CONN")]
    pub database: Option<String>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Manage the task list
    #[command(subcommand)]
    Task(TaskCommand),

    /// Show or change timer durations
    #[command(subcommand)]
    Prefs(PrefsCommand),

    /// Run the countdown in the foreground
    Timer(TimerArgs),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Task list operations
#[derive(Subcommand, Debug, Clone)]
pub enum TaskCommand {
    /// List all tasks
    List,

    /// Add a task
    Add {
        /// Task name (defaults to "Your new task")
        #[arg(value_parser = validate_task_name)]
        name: Option<String>,

        /// Horizontal layout position
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        x: f64,

        /// Vertical layout position
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        y: f64,
    },

    /// Rename a task
    Rename {
        id: i64,
        #[arg(value_parser = validate_task_name)]
        name: String,
    },

    /// Mark a task as completed
    Done { id: i64 },

    /// Mark a task as not completed
    Undone { id: i64 },

    /// Flip a task's completion state
    Toggle { id: i64 },

    /// Move a task to a new layout position
    Move {
        id: i64,
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
    },

    /// Delete a task
    Remove { id: i64 },
}

/// Preference operations
#[derive(Subcommand, Debug, Clone)]
pub enum PrefsCommand {
    /// Show the configured durations
    Show,

    /// Change one or more durations (in seconds)
    Set(PrefsSetArgs),
}

/// Arguments for `prefs set`
#[derive(Args, Debug, Clone, Default)]
pub struct PrefsSetArgs {
    /// Pomodoro duration in seconds
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub pomodoro: Option<u32>,

    /// Short rest duration in seconds
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub short_rest: Option<u32>,

    /// Long rest duration in seconds
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub long_rest: Option<u32>,
}

impl PrefsSetArgs {
    /// Returns true if no duration was given.
    pub fn is_empty(&self) -> bool {
        self.pomodoro.is_none() && self.short_rest.is_none() && self.long_rest.is_none()
    }
}

// ============================================================================
// Timer Command Arguments
// ============================================================================

/// Arguments for the timer command
#[derive(Args, Debug, Clone)]
pub struct TimerArgs {
    /// Number of phases to run back to back
    #[arg(
        short,
        long,
        default_value = "1",
        value_parser = clap::value_parser!(u32).range(1..=100)
    )]
    pub phases: u32,
}

impl Default for TimerArgs {
    fn default() -> Self {
        Self { phases: 1 }
    }
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Validates the task name.
///
/// - Must not be blank
/// - Must not exceed 100 characters
fn validate_task_name(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        return Err("task name must not be empty".to_string());
    }
    if s.chars().count() > 100 {
        return Err("task name must be at most 100 characters".to_string());
    }
    Ok(s.to_string())
}

// ============================================================================
// Tests
// ============================================================================
