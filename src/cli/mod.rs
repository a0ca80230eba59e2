//! CLI module for Pomodoko.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `app`: Task, preference and timer operations behind the commands
//! - `display`: Output formatting and display logic

pub mod app;
pub mod commands;
pub mod display;

pub use app::{run_phases, App, TimerSummary};
pub use commands::{Cli, Commands, PrefsCommand, PrefsSetArgs, TaskCommand, TimerArgs};
pub use display::Display;
