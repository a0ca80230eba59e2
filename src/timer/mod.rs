//! Timer engine for Pomodoko.
//!
//! This module drives a `Cycle` through its phases:
//! - Countdown with `tokio::time::interval`
//! - Pause / resume of any phase
//! - Pomodoro → short rest, or long rest every few pomodoros
//! - Event firing for the display and notification layers

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info};

use crate::types::{Cycle, State, Status, UserPreferences};
use crate::util::NOTIFICATION_SUCCESS;

/// Pomodoros between long rests.
pub const LONG_REST_INTERVAL: u32 = 4;

// ============================================================================
// TimerEvent
// ============================================================================

/// Events emitted by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// Countdown started or resumed
    Started { state: State },
    /// Countdown paused
    Paused { state: State },
    /// One second elapsed
    Tick { remaining_seconds: u32 },
    /// A phase ran to zero (or was skipped)
    PhaseCompleted {
        state: State,
        /// Sound resource to play
        notification: &'static str,
    },
    /// The next phase was loaded with its full duration
    PhaseStarted { state: State, duration: u32 },
    /// The current phase was rewound to its full duration
    Reset { state: State },
}

// ============================================================================
// TimerError
// ============================================================================

/// Errors returned by engine operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimerError {
    #[error("timer is already running")]
    AlreadyRunning,

    #[error("timer is already paused")]
    AlreadyPaused,

    #[error("timer event receiver was dropped")]
    ChannelClosed,
}

// ============================================================================
// TimerOptions
// ============================================================================

/// Behavioural switches for the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerOptions {
    /// Keep running into the next phase instead of pausing
    pub auto_advance: bool,
    /// Pomodoros between long rests
    pub long_rest_interval: u32,
}

impl Default for TimerOptions {
    fn default() -> Self {
        Self {
            auto_advance: false,
            long_rest_interval: LONG_REST_INTERVAL,
        }
    }
}

// ============================================================================
// TimerEngine
// ============================================================================

/// Countdown over a `Cycle`.
pub struct TimerEngine {
    cycle: Cycle,
    remaining_seconds: u32,
    completed_pomodoros: u32,
    preferences: UserPreferences,
    options: TimerOptions,
    event_tx: mpsc::UnboundedSender<TimerEvent>,
}

impl TimerEngine {
    /// Creates a paused engine at the start of a pomodoro.
    pub fn new(
        preferences: UserPreferences,
        options: TimerOptions,
        event_tx: mpsc::UnboundedSender<TimerEvent>,
    ) -> Self {
        Self {
            cycle: Cycle::new(State::Pomodoro, true),
            remaining_seconds: preferences.pomodoro_time,
            completed_pomodoros: 0,
            preferences,
            options,
            event_tx,
        }
    }

    pub fn cycle(&self) -> Cycle {
        self.cycle
    }

    pub fn status(&self) -> Status {
        self.cycle.status()
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn completed_pomodoros(&self) -> u32 {
        self.completed_pomodoros
    }

    pub fn preferences(&self) -> &UserPreferences {
        &self.preferences
    }

    /// Replaces the durations. Applies from the next phase onwards.
    pub fn set_preferences(&mut self, preferences: UserPreferences) {
        self.preferences = preferences;
    }

    /// Runs the countdown loop, ticking once per second.
    ///
    /// Never returns unless the event receiver is dropped. Spawn it on its
    /// own task and abort it to stop.
    pub async fn run(&mut self) -> Result<(), TimerError> {
        let mut ticker = interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick of an interval fires immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;

            if self.cycle.paused {
                continue;
            }
            self.tick()?;
        }
    }

    /// Advances the countdown by one second.
    ///
    /// Does nothing while paused. Completes the phase when it reaches zero.
    pub fn tick(&mut self) -> Result<(), TimerError> {
        if self.cycle.paused {
            return Ok(());
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        self.emit(TimerEvent::Tick {
            remaining_seconds: self.remaining_seconds,
        })?;

        if self.remaining_seconds == 0 {
            self.complete_phase()?;
        }
        Ok(())
    }

    /// Starts or resumes the countdown.
    pub fn start(&mut self) -> Result<(), TimerError> {
        if !self.cycle.paused {
            return Err(TimerError::AlreadyRunning);
        }
        self.cycle.paused = false;
        debug!(state = %self.cycle.state, remaining = self.remaining_seconds, "Timer started");
        self.emit(TimerEvent::Started {
            state: self.cycle.state,
        })
    }

    /// Pauses the countdown, keeping the remaining time.
    pub fn pause(&mut self) -> Result<(), TimerError> {
        if self.cycle.paused {
            return Err(TimerError::AlreadyPaused);
        }
        self.cycle.paused = true;
        debug!(state = %self.cycle.state, remaining = self.remaining_seconds, "Timer paused");
        self.emit(TimerEvent::Paused {
            state: self.cycle.state,
        })
    }

    /// Pauses a running timer or resumes a paused one.
    pub fn toggle_pause(&mut self) -> Result<Status, TimerError> {
        if self.cycle.paused {
            self.start()?;
        } else {
            self.pause()?;
        }
        Ok(self.status())
    }

    /// Ends the current phase immediately.
    pub fn skip(&mut self) -> Result<(), TimerError> {
        self.remaining_seconds = 0;
        self.complete_phase()
    }

    /// Rewinds the current phase to its full duration and pauses.
    pub fn reset(&mut self) -> Result<(), TimerError> {
        self.remaining_seconds = self.preferences.duration_for(self.cycle.state);
        self.cycle.paused = true;
        self.emit(TimerEvent::Reset {
            state: self.cycle.state,
        })
    }

    fn complete_phase(&mut self) -> Result<(), TimerError> {
        let finished = self.cycle.state;
        info!(state = %finished, sound = NOTIFICATION_SUCCESS, "Phase completed");
        self.emit(TimerEvent::PhaseCompleted {
            state: finished,
            notification: NOTIFICATION_SUCCESS,
        })?;

        let next = match finished {
            State::Pomodoro => {
                self.completed_pomodoros += 1;
                let every = self.options.long_rest_interval.max(1);
                if self.completed_pomodoros % every == 0 {
                    State::LongRest
                } else {
                    State::ShortRest
                }
            }
            State::ShortRest | State::LongRest => State::Pomodoro,
        };

        let duration = self.preferences.duration_for(next);
        self.cycle = Cycle::new(next, !self.options.auto_advance);
        self.remaining_seconds = duration;

        self.emit(TimerEvent::PhaseStarted {
            state: next,
            duration,
        })
    }

    fn emit(&self, event: TimerEvent) -> Result<(), TimerError> {
        self.event_tx
            .send(event)
            .map_err(|_| TimerError::ChannelClosed)
    }
}

// ============================================================================
// Tests
// ============================================================================
