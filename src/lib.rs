//! Pomodoro Clock Library
//!
//! This library provides the core functionality for the pomoclock CLI.
//! It includes:
//! - Timer engine alternating work sessions and breaks
//! - Async controller that ticks the engine once per second
//! - CLI command parsing, console loop and display utilities
//! - Type definitions for configuration and state
//! - Sound playback for the phase-complete alert

pub mod cli;
pub mod clock;
pub mod sound;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    format_clock, ClockState, ConfigError, Phase, RunStatus, SessionConfig, TimerSnapshot,
    TimerState,
};

// Re-export clock types
pub use clock::{ClockController, TickOutcome, TimerEngine, TimerEvent};

// Re-export sound types
pub use sound::{
    try_create_player, Alert, MockSoundPlayer, RodioSoundPlayer, SilentSoundPlayer, SoundError,
    SoundPlayer, SoundSource, ThreadedSoundPlayer,
};
