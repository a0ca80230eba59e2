//! Integration tests across the library modules.
//!
//! These tests exercise the public API end to end:
//! - Task list changes mirrored into the database and observed by subscribers
//! - Preferences stored in one session driving the timer in the next
//! - The timer engine ticking on a paused tokio clock

use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};

use pomodoko::cli::App;
use pomodoko::{
    format_minutes, format_seconds, AppConfig, Database, DatabaseLocation, Position, State,
    Status, TimerEngine, TimerEvent, TimerOptions, UserPreferences,
};

// ============================================================================
// Test Helpers
// ============================================================================

/// Config pointing at a scratch directory with the default connection string.
fn scratch_config(dir: &tempfile::TempDir) -> AppConfig {
    AppConfig {
        data_dir: dir.path().to_path_buf(),
        ..AppConfig::default()
    }
}

// ============================================================================
// Tasks
// ============================================================================

#[test]
fn test_tasks_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = scratch_config(&dir);

    {
        let app = App::open(&config).unwrap();
        let task = app.add_task(Some("Plan sprint"), Position::new(120.0, 48.0)).unwrap();
        app.toggle_task(task.id).unwrap();
        app.add_task(None, Position::default()).unwrap();
    }

    let app = App::open(&config).unwrap();
    let tasks = app.tasks().snapshot();

    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].name, "Plan sprint");
    assert!(tasks[0].completed);
    assert_eq!(tasks[0].position, Position::new(120.0, 48.0));
    assert_eq!(tasks[1].name, "Your new task");
    assert!(!tasks[1].completed);
}

#[test]
fn test_subscriber_observes_app_mutations() {
    let app = App::with_database(Database::open_in_memory().unwrap()).unwrap();
    let mut rx = app.tasks().subscribe();

    let task = app.add_task(Some("Watch me"), Position::default()).unwrap();
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().len(), 1);

    app.rename_task(task.id, "Watched").unwrap();
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update()[0].name, "Watched");

    // A failed mutation must not wake observers.
    assert!(app.toggle_task(task.id + 100).is_err());
    assert!(!rx.has_changed().unwrap());
}

#[test]
fn test_database_file_created_under_data_dir() {
    let dir = tempfile::tempdir().unwrap();
    let config = scratch_config(&dir);

    assert_eq!(
        config.location().unwrap(),
        DatabaseLocation::File(dir.path().join("pomodoko.db"))
    );
    App::open(&config).unwrap();
    assert!(dir.path().join("pomodoko.db").exists());
}

// ============================================================================
// Preferences → Timer
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_stored_preferences_drive_engine() {
    let dir = tempfile::tempdir().unwrap();
    let location = DatabaseLocation::File(dir.path().join("prefs.db"));

    {
        let db = Database::open(&location).unwrap();
        let prefs = UserPreferences::default()
            .with_pomodoro_time(2)
            .with_short_rest_time(90);
        db.save_preferences(&prefs).unwrap();
    }

    let prefs = Database::open(&location).unwrap().load_preferences().unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut engine = TimerEngine::new(prefs, TimerOptions::default(), tx);
    engine.start().unwrap();
    assert_eq!(engine.status(), Status::Running);

    let handle = tokio::spawn(async move {
        let _ = engine.run().await;
    });

    let mut events = Vec::new();
    let result = timeout(Duration::from_secs(10), async {
        while let Some(event) = rx.recv().await {
            let done = matches!(event, TimerEvent::PhaseStarted { .. });
            events.push(event);
            if done {
                break;
            }
        }
    })
    .await;
    handle.abort();

    assert!(result.is_ok(), "phase never completed");
    assert_eq!(
        events[1..],
        [
            TimerEvent::Tick {
                remaining_seconds: 1
            },
            TimerEvent::Tick {
                remaining_seconds: 0
            },
            TimerEvent::PhaseCompleted {
                state: State::Pomodoro,
                notification: "complete.mp3"
            },
            TimerEvent::PhaseStarted {
                state: State::ShortRest,
                duration: 90
            },
        ]
    );

    // The next phase renders as 01:30 on the display.
    assert_eq!(format_minutes(90), "01");
    assert_eq!(format_seconds(90), "30");
}
