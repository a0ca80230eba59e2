//! Display utilities for the Pomodoko CLI.
//!
//! This module provides formatted output for:
//! - Task lists and single-task confirmations
//! - Preference summaries
//! - The live countdown line
//! - Error messages

use std::io::{self, Write};

use crate::types::{State, Task, UserPreferences};
use crate::util::{format_clock, NOTIFICATION_SUCCESS};

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows every task, one per line.
    pub fn show_tasks(tasks: &[Task]) {
        if tasks.is_empty() {
            println!("No tasks yet");
            return;
        }
        for task in tasks {
            println!("{}", Self::task_line(task));
        }
    }

    /// Shows a confirmation after a task was created or changed.
    pub fn show_task_saved(verb: &str, task: &Task) {
        println!("* Task {verb}");
        println!("  {}", Self::task_line(task));
    }

    /// Shows a confirmation after a task was deleted.
    pub fn show_task_removed(task: &Task) {
        println!("* Task removed: {}", task.name);
    }

    /// Shows the configured durations.
    pub fn show_preferences(prefs: &UserPreferences) {
        println!("Timer durations");
        println!("─────────────────────────────");
        for (state, _) in State::ALL {
            let seconds = prefs.duration_for(state);
            println!(
                "{:<12} {} ({}s)",
                format!("{}:", state.label()),
                format_clock(u64::from(seconds)),
                seconds
            );
        }
    }

    /// Redraws the countdown line in place.
    pub fn show_countdown(state: State, remaining_seconds: u32) -> io::Result<()> {
        print!(
            "\r{:<11} {}",
            state.label(),
            format_clock(u64::from(remaining_seconds))
        );
        io::stdout().flush()
    }

    /// Shows a phase completion.
    pub fn show_phase_complete(state: State) {
        println!();
        println!("* {} complete ({})", state.label(), NOTIFICATION_SUCCESS);
    }

    /// Shows an interrupted countdown.
    pub fn show_interrupted(state: State, remaining_seconds: u32) {
        println!();
        println!(
            "[] Stopped during {} with {} left",
            state.label(),
            format_clock(u64::from(remaining_seconds))
        );
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("error: {}", message);
    }

    /// Formats a task as `#id [x] name @ (x, y)`.
    pub fn task_line(task: &Task) -> String {
        let mark = if task.completed { "x" } else { " " };
        format!(
            "#{} [{}] {} @ ({}, {})",
            task.id, mark, task.name, task.position.x, task.position.y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Position;

    #[test]
    fn test_task_line_open() {
        let task = Task::new(3).with_position(Position::new(1.5, -2.0));
        assert_eq!(Display::task_line(&task), "#3 [ ] Your new task @ (1.5, -2)");
    }

    #[test]
    fn test_countdown_flushes() {
        assert!(Display::show_countdown(State::ShortRest, 90).is_ok());
    }

    #[test]
    fn test_task_line_completed() {
        let mut task = Task::new(8).with_name("Ship it");
        task.completed = true;
        assert_eq!(Display::task_line(&task), "#8 [x] Ship it @ (0, 0)");
    }
}
