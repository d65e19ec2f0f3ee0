//! Clock module for the Pomodoro Clock.
//!
//! This module contains the countdown machinery:
//! - `engine`: Timer engine with state transitions and countdown logic
//! - `controller`: Async handle that ticks the engine once per second

pub mod controller;
pub mod engine;

pub use controller::{ClockController, TICK_INTERVAL};
pub use engine::{TickOutcome, TimerEngine, TimerEvent};
