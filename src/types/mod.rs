//! Core data types for the Pomodoro clock.
//!
//! This module defines the data structures used for:
//! - Session/break configuration with validation
//! - Timer state (phase, remaining time, run status)
//! - The read-only snapshot handed to presentation code

use serde::Serialize;
use thiserror::Error;

// ============================================================================
// Constants
// ============================================================================

/// Smallest accepted session or break length, in minutes.
pub const MIN_MINUTES: u32 = 1;

/// Largest accepted session or break length, in minutes.
pub const MAX_MINUTES: u32 = 60;

/// Default work session length, in minutes.
pub const DEFAULT_SESSION_MINUTES: u32 = 25;

/// Default break length, in minutes.
pub const DEFAULT_BREAK_MINUTES: u32 = 5;

// ============================================================================
// Phase
// ============================================================================

/// Which of the two intervals is currently counting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Work session
    #[default]
    Work,
    /// Break between sessions
    Break,
}

impl Phase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Work => "work",
            Phase::Break => "break",
        }
    }

    /// Returns the label shown above the countdown.
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Work => "Session",
            Phase::Break => "Break",
        }
    }

    /// Returns the phase that follows this one.
    pub fn next(&self) -> Phase {
        match self {
            Phase::Work => Phase::Break,
            Phase::Break => Phase::Work,
        }
    }
}

// ============================================================================
// RunStatus
// ============================================================================

/// Whether the countdown is advancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Not yet started, or just reset
    #[default]
    Stopped,
    /// Counting down
    Running,
    /// Frozen mid-phase
    Paused,
}

impl RunStatus {
    /// Returns the string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Stopped => "stopped",
            RunStatus::Running => "running",
            RunStatus::Paused => "paused",
        }
    }
}

// ============================================================================
// ClockState
// ============================================================================

/// The five logical states of the clock, collapsed from `(Phase, RunStatus)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockState {
    /// Work phase, stopped (start state and the state after reset)
    Initial,
    /// Work phase, counting down
    Running,
    /// Work phase, frozen
    Paused,
    /// Break phase, counting down
    BreakActive,
    /// Break phase, frozen
    BreakPaused,
}

impl ClockState {
    /// Collapses a phase and run status into a clock state.
    pub fn from_parts(phase: Phase, status: RunStatus) -> Self {
        match (phase, status) {
            (Phase::Work, RunStatus::Running) => ClockState::Running,
            (Phase::Work, RunStatus::Paused) => ClockState::Paused,
            (Phase::Break, RunStatus::Running) => ClockState::BreakActive,
            (Phase::Break, RunStatus::Paused) => ClockState::BreakPaused,
            // Stopped is only entered through reset, which lands on the work phase.
            (_, RunStatus::Stopped) => ClockState::Initial,
        }
    }

    /// Returns a short human-readable description.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClockState::Initial => "stopped",
            ClockState::Running => "running",
            ClockState::Paused => "paused",
            ClockState::BreakActive => "break",
            ClockState::BreakPaused => "break paused",
        }
    }
}

// ============================================================================
// SessionConfig
// ============================================================================

/// Errors returned when building a [`SessionConfig`] from raw values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Session length outside `MIN_MINUTES..=MAX_MINUTES`
    #[error("session length must be between {MIN_MINUTES} and {MAX_MINUTES} minutes, got {0}")]
    SessionOutOfRange(i64),

    /// Break length outside `MIN_MINUTES..=MAX_MINUTES`
    #[error("break length must be between {MIN_MINUTES} and {MAX_MINUTES} minutes, got {0}")]
    BreakOutOfRange(i64),
}

/// Session and break lengths, in whole minutes.
///
/// Both values always lie in `MIN_MINUTES..=MAX_MINUTES`; the fields are
/// private so the only ways in are the validating constructor and the
/// engine's guarded setters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    session_minutes: u32,
    break_minutes: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_minutes: DEFAULT_SESSION_MINUTES,
            break_minutes: DEFAULT_BREAK_MINUTES,
        }
    }
}

impl SessionConfig {
    /// Creates a configuration, validating both lengths.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first value that is out of range.
    pub fn new(session_minutes: i64, break_minutes: i64) -> Result<Self, ConfigError> {
        let session_minutes =
            checked_minutes(session_minutes).ok_or(ConfigError::SessionOutOfRange(session_minutes))?;
        let break_minutes =
            checked_minutes(break_minutes).ok_or(ConfigError::BreakOutOfRange(break_minutes))?;

        Ok(Self {
            session_minutes,
            break_minutes,
        })
    }

    /// Work session length in minutes.
    pub fn session_minutes(&self) -> u32 {
        self.session_minutes
    }

    /// Break length in minutes.
    pub fn break_minutes(&self) -> u32 {
        self.break_minutes
    }

    /// Length of the given phase in seconds.
    pub fn phase_seconds(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Work => self.session_minutes * 60,
            Phase::Break => self.break_minutes * 60,
        }
    }

    /// Upper bound for `remaining_seconds` under this configuration.
    pub fn max_seconds(&self) -> u32 {
        self.session_minutes.max(self.break_minutes) * 60
    }

    pub(crate) fn set_minutes(&mut self, phase: Phase, minutes: u32) {
        match phase {
            Phase::Work => self.session_minutes = minutes,
            Phase::Break => self.break_minutes = minutes,
        }
    }

    pub(crate) fn minutes(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Work => self.session_minutes,
            Phase::Break => self.break_minutes,
        }
    }
}

/// Returns the value as minutes if it lies within the accepted range.
pub fn checked_minutes(minutes: i64) -> Option<u32> {
    u32::try_from(minutes)
        .ok()
        .filter(|m| (MIN_MINUTES..=MAX_MINUTES).contains(m))
}

// ============================================================================
// TimerState
// ============================================================================

/// Mutable countdown state owned by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    /// Phase currently counting down
    pub(crate) phase: Phase,
    /// Seconds left in the current phase
    pub(crate) remaining_seconds: u32,
    /// Whether the countdown is advancing
    pub(crate) run_status: RunStatus,
}

impl TimerState {
    /// Creates the initial state: work phase, stopped, full session length.
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            phase: Phase::Work,
            remaining_seconds: config.phase_seconds(Phase::Work),
            run_status: RunStatus::Stopped,
        }
    }

    /// Phase currently counting down.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Seconds left in the current phase.
    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    /// Whether the countdown is advancing.
    pub fn run_status(&self) -> RunStatus {
        self.run_status
    }

    /// Collapsed clock state.
    pub fn clock_state(&self) -> ClockState {
        ClockState::from_parts(self.phase, self.run_status)
    }

    /// Returns true if the countdown is advancing.
    pub fn is_running(&self) -> bool {
        self.run_status == RunStatus::Running
    }

    /// Switches to `phase` with its full configured duration.
    pub(crate) fn enter_phase(&mut self, phase: Phase, config: &SessionConfig) {
        self.phase = phase;
        self.remaining_seconds = config.phase_seconds(phase);
    }
}

// ============================================================================
// TimerSnapshot
// ============================================================================

/// Owned read-only view of the clock for presentation code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    /// Current phase
    pub phase: Phase,
    /// Current run status
    pub run_status: RunStatus,
    /// Collapsed clock state
    pub state: ClockState,
    /// Seconds left in the current phase
    pub remaining_seconds: u32,
    /// Configured work session length
    pub session_minutes: u32,
    /// Configured break length
    pub break_minutes: u32,
    /// Remaining time rendered as `MM:SS`
    pub time_left: String,
}

impl TimerSnapshot {
    /// Builds a snapshot from engine state and configuration.
    pub fn new(state: &TimerState, config: &SessionConfig) -> Self {
        Self {
            phase: state.phase,
            run_status: state.run_status,
            state: state.clock_state(),
            remaining_seconds: state.remaining_seconds,
            session_minutes: config.session_minutes(),
            break_minutes: config.break_minutes(),
            time_left: format_clock(state.remaining_seconds),
        }
    }
}

/// Formats seconds as `MM:SS`, both fields zero-padded to two digits.
pub fn format_clock(total_seconds: u32) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

// ============================================================================
// Tests
// ============================================================================
