//! Application layer binding the task list, storage and timer together.
//!
//! Every task mutation is written to the database first and only then applied
//! to the in-memory `TasksObject`, so a failed write leaves subscribers
//! untouched and memory and storage stay in step.

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::state::TasksObject;
use crate::storage::{Database, StorageError};
use crate::timer::{TimerEngine, TimerError, TimerEvent, TimerOptions};
use crate::types::{Position, State, Task, UserPreferences};
use crate::util::DEFAULT_TASK_NAME;

use super::commands::PrefsSetArgs;
use super::display::Display;

/// Outcome of a foreground countdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerSummary {
    /// Phases that ran to zero, in order
    pub completed: Vec<State>,
    /// Whether the run was cut short by Ctrl-C
    pub interrupted: bool,
}

/// Owns the database connection and the live task list.
pub struct App {
    db: Database,
    tasks: TasksObject,
}

impl App {
    /// Opens the configured database and loads the task list.
    pub fn open(config: &AppConfig) -> Result<Self, StorageError> {
        let db = Database::open(&config.location()?)?;
        Self::with_database(db)
    }

    /// Wraps an already opened database.
    pub fn with_database(db: Database) -> Result<Self, StorageError> {
        let tasks = TasksObject::with_tasks(db.list_tasks()?);
        debug!(count = tasks.len(), "Task list loaded");
        Ok(Self { db, tasks })
    }

    pub fn tasks(&self) -> &TasksObject {
        &self.tasks
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    // ------------------------------------------------------------------------
    // Tasks
    // ------------------------------------------------------------------------

    /// Creates a task, using the default name when none is given.
    pub fn add_task(&self, name: Option<&str>, position: Position) -> Result<Task, StorageError> {
        let task = self
            .db
            .insert_task(name.unwrap_or(DEFAULT_TASK_NAME), position)?;
        if !self.tasks.push(task.clone()) {
            warn!(id = task.id, "Task id already in the list, reloading");
            self.tasks.replace(self.db.list_tasks()?);
        }
        Ok(task)
    }

    pub fn rename_task(&self, id: i64, name: &str) -> Result<Task, StorageError> {
        self.write_through(id, |task| task.name = name.to_string())
    }

    pub fn set_completed(&self, id: i64, completed: bool) -> Result<Task, StorageError> {
        self.write_through(id, |task| task.completed = completed)
    }

    pub fn toggle_task(&self, id: i64) -> Result<Task, StorageError> {
        self.write_through(id, |task| task.completed = !task.completed)
    }

    pub fn move_task(&self, id: i64, position: Position) -> Result<Task, StorageError> {
        self.write_through(id, |task| task.position = position)
    }

    pub fn remove_task(&self, id: i64) -> Result<Task, StorageError> {
        let task = self.tasks.get(id).ok_or(StorageError::TaskNotFound(id))?;
        self.db.delete_task(id)?;
        self.tasks.remove(id);
        Ok(task)
    }

    /// Applies `f` to a copy of the task, stores it, then publishes it.
    fn write_through<F>(&self, id: i64, f: F) -> Result<Task, StorageError>
    where
        F: FnOnce(&mut Task),
    {
        let mut task = self.tasks.get(id).ok_or(StorageError::TaskNotFound(id))?;
        f(&mut task);
        self.db.update_task(&task)?;
        self.tasks.put(task.clone());
        Ok(task)
    }

    // ------------------------------------------------------------------------
    // Preferences
    // ------------------------------------------------------------------------

    pub fn preferences(&self) -> Result<UserPreferences, StorageError> {
        self.db.load_preferences()
    }

    /// Applies the given overrides on top of the stored preferences.
    pub fn update_preferences(&self, args: &PrefsSetArgs) -> Result<UserPreferences, StorageError> {
        let mut prefs = self.db.load_preferences()?;
        if let Some(seconds) = args.pomodoro {
            prefs.pomodoro_time = seconds;
        }
        if let Some(seconds) = args.short_rest {
            prefs.short_rest_time = seconds;
        }
        if let Some(seconds) = args.long_rest {
            prefs.long_rest_time = seconds;
        }
        self.db.save_preferences(&prefs)?;
        Ok(prefs)
    }
}

/// Drives a fresh engine through `phases` phases or until `stop` resolves.
pub async fn run_phases<F>(
    preferences: UserPreferences,
    phases: u32,
    stop: F,
) -> Result<TimerSummary, TimerError>
where
    F: std::future::Future,
{
    let (tx, mut rx) = mpsc::unbounded_channel();
    let options = TimerOptions {
        auto_advance: true,
        ..TimerOptions::default()
    };
    let mut engine = TimerEngine::new(preferences, options, tx);
    engine.start()?;

    let mut state = engine.cycle().state;
    let mut remaining = engine.remaining_seconds();
    redraw(state, remaining);

    let handle = tokio::spawn(async move { engine.run().await });
    tokio::pin!(stop);

    let mut summary = TimerSummary {
        completed: Vec::new(),
        interrupted: false,
    };

    while (summary.completed.len() as u32) < phases {
        tokio::select! {
            event = rx.recv() => match event {
                Some(TimerEvent::Tick { remaining_seconds }) => {
                    remaining = remaining_seconds;
                    redraw(state, remaining);
                }
                Some(TimerEvent::PhaseCompleted { state: finished, .. }) => {
                    Display::show_phase_complete(finished);
                    summary.completed.push(finished);
                }
                Some(TimerEvent::PhaseStarted { state: next, duration }) => {
                    state = next;
                    remaining = duration;
                    if (summary.completed.len() as u32) < phases {
                        redraw(state, remaining);
                    }
                }
                Some(_) => {}
                None => break,
            },
            _ = &mut stop => {
                summary.interrupted = true;
                Display::show_interrupted(state, remaining);
                break;
            }
        }
    }

    handle.abort();
    match handle.await {
        Ok(Err(e)) => Err(e),
        _ => Ok(summary),
    }
}

fn redraw(state: State, remaining: u32) {
    if let Err(e) = Display::show_countdown(state, remaining) {
        warn!("Failed to draw countdown: {}", e);
    }
}
