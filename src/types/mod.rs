//! Core data types for Pomodoko.
//!
//! This module defines the vocabulary shared by the timer, the task list
//! and the storage layer:
//! - Timer run status and cycle phase
//! - The transient `Cycle` record
//! - User-configurable phase durations
//! - Task records with a free-form 2-D position

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::{DEFAULT_TASK_NAME, LONG_REST_DEFAULT, POMODORO_DEFAULT, SHORT_REST_DEFAULT};

// ============================================================================
// Status
// ============================================================================

/// Whether a timer is currently counting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Paused,
    Running,
}

impl Status {
    /// Every variant paired with its stored ordinal.
    pub const ALL: [(Status, u8); 2] = [(Status::Paused, 0), (Status::Running, 1)];

    /// Returns the stable ordinal used by external consumers.
    pub fn as_ordinal(self) -> u8 {
        match self {
            Status::Paused => 0,
            Status::Running => 1,
        }
    }

    /// Looks up a status by its stored ordinal.
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL
            .iter()
            .find(|(_, o)| *o == ordinal)
            .map(|(status, _)| *status)
    }

    /// Returns the external name of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Paused => "PAUSED",
            Status::Running => "RUNNING",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// State
// ============================================================================

/// The active phase of the work/rest cycle.
///
/// Variants carry no ordering; `State` deliberately does not implement
/// `PartialOrd`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum State {
    /// Focused work interval
    Pomodoro,
    /// Break following a pomodoro
    ShortRest,
    /// Longer break after several pomodoros
    LongRest,
}

impl State {
    /// Every variant paired with its stored ordinal.
    pub const ALL: [(State, u8); 3] = [
        (State::Pomodoro, 0),
        (State::ShortRest, 1),
        (State::LongRest, 2),
    ];

    /// Returns the stable ordinal used by external consumers.
    pub fn as_ordinal(self) -> u8 {
        match self {
            State::Pomodoro => 0,
            State::ShortRest => 1,
            State::LongRest => 2,
        }
    }

    /// Looks up a state by its stored ordinal.
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL
            .iter()
            .find(|(_, o)| *o == ordinal)
            .map(|(state, _)| *state)
    }

    /// Returns the external name of the state.
    pub fn as_str(self) -> &'static str {
        match self {
            State::Pomodoro => "POMODORO",
            State::ShortRest => "SHORT_REST",
            State::LongRest => "LONG_REST",
        }
    }

    /// Returns a human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            State::Pomodoro => "Pomodoro",
            State::ShortRest => "Short rest",
            State::LongRest => "Long rest",
        }
    }

    /// Returns true for the two rest phases.
    pub fn is_rest(self) -> bool {
        matches!(self, State::ShortRest | State::LongRest)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for State {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .map(|(state, _)| *state)
            .find(|state| state.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown state: {s}"))
    }
}

// ============================================================================
// Cycle
// ============================================================================

/// Current phase plus whether it is paused.
///
/// `paused` is independent of `state`: any phase may be paused or running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cycle {
    pub state: State,
    pub paused: bool,
}

impl Default for Cycle {
    fn default() -> Self {
        Self {
            state: State::Pomodoro,
            paused: false,
        }
    }
}

impl Cycle {
    pub fn new(state: State, paused: bool) -> Self {
        Self { state, paused }
    }

    /// Returns the run status derived from `paused`.
    pub fn status(&self) -> Status {
        if self.paused {
            Status::Paused
        } else {
            Status::Running
        }
    }
}

// ============================================================================
// UserPreferences
// ============================================================================

/// Errors raised when validating preferences.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PreferencesError {
    /// A phase duration was zero.
    #[error("{0} duration must be a positive number of seconds")]
    ZeroDuration(State),
}

/// User-configurable phase durations, in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub pomodoro_time: u32,
    pub short_rest_time: u32,
    pub long_rest_time: u32,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            pomodoro_time: POMODORO_DEFAULT,
            short_rest_time: SHORT_REST_DEFAULT,
            long_rest_time: LONG_REST_DEFAULT,
        }
    }
}

impl UserPreferences {
    pub fn with_pomodoro_time(mut self, seconds: u32) -> Self {
        self.pomodoro_time = seconds;
        self
    }

    pub fn with_short_rest_time(mut self, seconds: u32) -> Self {
        self.short_rest_time = seconds;
        self
    }

    pub fn with_long_rest_time(mut self, seconds: u32) -> Self {
        self.long_rest_time = seconds;
        self
    }

    /// Returns the configured duration of the given phase.
    pub fn duration_for(&self, state: State) -> u32 {
        match state {
            State::Pomodoro => self.pomodoro_time,
            State::ShortRest => self.short_rest_time,
            State::LongRest => self.long_rest_time,
        }
    }

    /// Checks that every duration is positive.
    pub fn validate(&self) -> Result<(), PreferencesError> {
        for (state, _) in State::ALL {
            if self.duration_for(state) == 0 {
                return Err(PreferencesError::ZeroDuration(state));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Task
// ============================================================================

/// Free-form layout coordinate. No bounds are enforced.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A checklist item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Identifier assigned by the storage layer
    pub id: i64,
    pub name: String,
    pub completed: bool,
    pub position: Position,
}

impl Task {
    /// Creates an incomplete task with the default name at the origin.
    pub fn new(id: i64) -> Self {
        Self {
            id,
            name: DEFAULT_TASK_NAME.to_string(),
            completed: false,
            position: Position::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod status_tests {
        use super::*;

        #[test]
        fn test_exactly_two_variants() {
            assert_eq!(Status::ALL.len(), 2);
        }

        #[test]
        fn test_ordinals() {
            assert_eq!(Status::Paused.as_ordinal(), 0);
            assert_eq!(Status::Running.as_ordinal(), 1);
            assert_eq!(Status::from_ordinal(1), Some(Status::Running));
            assert_eq!(Status::from_ordinal(2), None);
        }

        #[test]
        fn test_ordinal_table_matches_as_ordinal() {
            for (status, ordinal) in Status::ALL {
                assert_eq!(status.as_ordinal(), ordinal);
            }
        }

        #[test]
        fn test_serialize() {
            let json = serde_json::to_string(&Status::Running).unwrap();
            assert_eq!(json, "\"RUNNING\"");
        }
    }

    mod state_tests {
        use super::*;

        #[test]
        fn test_exactly_three_variants() {
            assert_eq!(State::ALL.len(), 3);
        }

        #[test]
        fn test_ordinals_round_trip_through_table() {
            for (state, ordinal) in State::ALL {
                assert_eq!(state.as_ordinal(), ordinal);
                assert_eq!(State::from_ordinal(ordinal), Some(state));
            }
            assert_eq!(State::from_ordinal(3), None);
        }

        #[test]
        fn test_names() {
            assert_eq!(State::Pomodoro.as_str(), "POMODORO");
            assert_eq!(State::ShortRest.as_str(), "SHORT_REST");
            assert_eq!(State::LongRest.as_str(), "LONG_REST");
        }

        #[test]
        fn test_from_str() {
            assert_eq!("short_rest".parse::<State>(), Ok(State::ShortRest));
            assert_eq!("LONG_REST".parse::<State>(), Ok(State::LongRest));
            assert!("nap".parse::<State>().is_err());
        }

        #[test]
        fn test_serde_uses_names() {
            let json = serde_json::to_string(&State::ShortRest).unwrap();
            assert_eq!(json, "\"SHORT_REST\"");

            let state: State = serde_json::from_str("\"LONG_REST\"").unwrap();
            assert_eq!(state, State::LongRest);
        }

        #[test]
        fn test_is_rest() {
            assert!(!State::Pomodoro.is_rest());
            assert!(State::ShortRest.is_rest());
            assert!(State::LongRest.is_rest());
        }
    }

    mod cycle_tests {
        use super::*;

        #[test]
        fn test_default_is_running_pomodoro() {
            let cycle = Cycle::default();
            assert_eq!(cycle.state, State::Pomodoro);
            assert!(!cycle.paused);
            assert_eq!(cycle.status(), Status::Running);
        }

        #[test]
        fn test_any_state_may_be_paused() {
            for (state, _) in State::ALL {
                let cycle = Cycle::new(state, true);
                assert_eq!(cycle.state, state);
                assert_eq!(cycle.status(), Status::Paused);
            }
        }
    }

    mod preferences_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let prefs = UserPreferences::default();
            assert_eq!(prefs.pomodoro_time, 1500);
            assert_eq!(prefs.short_rest_time, 300);
            assert_eq!(prefs.long_rest_time, 900);
            assert!(prefs.validate().is_ok());
        }

        #[test]
        fn test_duration_for() {
            let prefs = UserPreferences::default()
                .with_pomodoro_time(60)
                .with_short_rest_time(10)
                .with_long_rest_time(30);

            assert_eq!(prefs.duration_for(State::Pomodoro), 60);
            assert_eq!(prefs.duration_for(State::ShortRest), 10);
            assert_eq!(prefs.duration_for(State::LongRest), 30);
        }

        #[test]
        fn test_validate_rejects_zero() {
            let prefs = UserPreferences::default().with_short_rest_time(0);
            assert_eq!(
                prefs.validate(),
                Err(PreferencesError::ZeroDuration(State::ShortRest))
            );
        }

        #[test]
        fn test_field_names_in_json() {
            let json = serde_json::to_string(&UserPreferences::default()).unwrap();
            assert!(json.contains("\"pomodoro_time\":1500"));
            assert!(json.contains("\"short_rest_time\":300"));
            assert!(json.contains("\"long_rest_time\":900"));
        }
    }

    mod task_tests {
        use super::*;

        #[test]
        fn test_new_task_defaults() {
            let task = Task::new(7);
            assert_eq!(task.id, 7);
            assert_eq!(task.name, "Your new task");
            assert!(!task.completed);
            assert_eq!(task.position, Position::new(0.0, 0.0));
        }

        #[test]
        fn test_overrides() {
            let task = Task::new(1)
                .with_name("Write report")
                .with_position(Position::new(-40.5, 1e6));
            assert_eq!(task.name, "Write report");
            assert_eq!(task.position.x, -40.5);
            assert_eq!(task.position.y, 1e6);
        }

        #[test]
        fn test_position_serializes_nested() {
            let task = Task::new(3).with_position(Position::new(10.0, 20.0));
            let value = serde_json::to_value(&task).unwrap();
            assert_eq!(value["position"]["x"], 10.0);
            assert_eq!(value["position"]["y"], 20.0);
            assert_eq!(value["completed"], false);
        }
    }
}
