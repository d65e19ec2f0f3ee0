//! CLI module for the Pomodoro Clock.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `console`: Interactive command loop driving the clock
//! - `display`: Output formatting and display logic

pub mod commands;
pub mod console;
pub mod display;

pub use commands::{Cli, Commands, RunArgs};
pub use console::{run_session, CommandParseError, ConsoleCommand, LengthChange};
pub use display::Display;
