//! Timer engine for the Pomodoro clock.
//!
//! This module provides the countdown state machine:
//! - Session/break configuration guarded by run status
//! - Start/pause/toggle/reset transitions
//! - One-second ticks with an atomic phase flip at zero
//! - Event firing for presentation, alert on phase completion
//!
//! Every operation is total: requests that do not apply in the current
//! state are ignored rather than reported as errors.

use tokio::sync::mpsc;
use tracing::{debug, info, trace};

use crate::sound::Alert;
use crate::types::{
    checked_minutes, ClockState, Phase, RunStatus, SessionConfig, TimerSnapshot, TimerState,
};

// ============================================================================
// TimerEvent
// ============================================================================

/// Events published by the engine for presentation code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// Countdown started or resumed
    Started {
        /// Phase that is now counting down
        phase: Phase,
        /// Seconds left in that phase
        remaining_seconds: u32,
    },
    /// Countdown frozen
    Paused {
        /// Phase that was counting down
        phase: Phase,
        /// Seconds left in that phase
        remaining_seconds: u32,
    },
    /// Clock restored to its defaults
    Reset,
    /// Session or break length changed
    ConfigChanged {
        /// New work session length
        session_minutes: u32,
        /// New break length
        break_minutes: u32,
    },
    /// One second elapsed
    Tick {
        /// Phase counting down
        phase: Phase,
        /// Remaining seconds after the tick
        remaining_seconds: u32,
    },
    /// A phase ran out and the next one began
    PhaseCompleted {
        /// Phase that just finished
        finished: Phase,
        /// Phase that is now counting down
        next: Phase,
    },
}

// ============================================================================
// TickOutcome
// ============================================================================

/// What a single call to [`TimerEngine::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The clock was not running; nothing changed.
    Idle,
    /// One second was taken off the current phase.
    Counted {
        /// Remaining seconds after the tick
        remaining_seconds: u32,
    },
    /// The current phase ran out and the clock flipped to the next one.
    PhaseCompleted {
        /// Phase that just finished
        finished: Phase,
        /// Phase that is now counting down
        next: Phase,
    },
}

// ============================================================================
// TimerEngine
// ============================================================================

/// Countdown state machine alternating between work and break phases.
#[derive(Debug)]
pub struct TimerEngine {
    /// Session and break lengths
    config: SessionConfig,
    /// Current countdown state
    state: TimerState,
    /// Cue played when a phase completes
    alert: Alert,
    /// Event sender channel
    event_tx: mpsc::UnboundedSender<TimerEvent>,
}

impl TimerEngine {
    /// Creates an engine with the default 25/5 configuration.
    pub fn new(alert: Alert, event_tx: mpsc::UnboundedSender<TimerEvent>) -> Self {
        Self::with_config(SessionConfig::default(), alert, event_tx)
    }

    /// Creates an engine with the given configuration, stopped at the start
    /// of a work session.
    pub fn with_config(
        config: SessionConfig,
        alert: Alert,
        event_tx: mpsc::UnboundedSender<TimerEvent>,
    ) -> Self {
        Self {
            config,
            state: TimerState::new(&config),
            alert,
            event_tx,
        }
    }

    // ------------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------------

    /// Sets the work session length.
    ///
    /// Ignored if `minutes` is outside 1..=60 or the countdown is running.
    /// While idle in the work phase the remaining time follows the new length.
    pub fn set_session_length(&mut self, minutes: i64) {
        self.set_length(Phase::Work, minutes);
    }

    /// Sets the break length.
    ///
    /// Ignored if `minutes` is outside 1..=60 or the countdown is running.
    /// While paused in the break phase the remaining time follows the new
    /// length.
    pub fn set_break_length(&mut self, minutes: i64) {
        self.set_length(Phase::Break, minutes);
    }

    /// Changes the session length by `delta` minutes (the +/- controls).
    pub fn adjust_session_length(&mut self, delta: i64) {
        self.adjust_length(Phase::Work, delta);
    }

    /// Changes the break length by `delta` minutes (the +/- controls).
    pub fn adjust_break_length(&mut self, delta: i64) {
        self.adjust_length(Phase::Break, delta);
    }

    fn adjust_length(&mut self, phase: Phase, delta: i64) {
        let current = i64::from(self.config.minutes(phase));
        self.set_length(phase, current.saturating_add(delta));
    }

    fn set_length(&mut self, phase: Phase, minutes: i64) {
        if self.state.is_running() {
            debug!("Ignoring {} length change while running", phase.as_str());
            return;
        }
        let Some(minutes) = checked_minutes(minutes) else {
            debug!("Ignoring out-of-range {} length: {}", phase.as_str(), minutes);
            return;
        };

        self.config.set_minutes(phase, minutes);
        if self.state.phase == phase {
            self.state.remaining_seconds = self.config.phase_seconds(phase);
        }

        debug!(
            "Configuration changed: session={} break={}",
            self.config.session_minutes(),
            self.config.break_minutes()
        );
        self.emit(TimerEvent::ConfigChanged {
            session_minutes: self.config.session_minutes(),
            break_minutes: self.config.break_minutes(),
        });
    }

    // ------------------------------------------------------------------------
    // Run control
    // ------------------------------------------------------------------------

    /// Starts or resumes the countdown in the current phase.
    ///
    /// No-op if already running.
    pub fn start(&mut self) {
        if self.state.is_running() {
            return;
        }

        self.state.run_status = RunStatus::Running;
        debug!(
            "Countdown started: {} with {}s left",
            self.state.phase.as_str(),
            self.state.remaining_seconds
        );
        self.emit(TimerEvent::Started {
            phase: self.state.phase,
            remaining_seconds: self.state.remaining_seconds,
        });
    }

    /// Freezes a running countdown.
    ///
    /// No-op unless running.
    pub fn pause(&mut self) {
        if !self.state.is_running() {
            return;
        }

        self.state.run_status = RunStatus::Paused;
        debug!(
            "Countdown paused: {} with {}s left",
            self.state.phase.as_str(),
            self.state.remaining_seconds
        );
        self.emit(TimerEvent::Paused {
            phase: self.state.phase,
            remaining_seconds: self.state.remaining_seconds,
        });
    }

    /// Pauses if running, otherwise starts (the single start/stop control).
    pub fn toggle(&mut self) {
        if self.state.is_running() {
            self.pause();
        } else {
            self.start();
        }
    }

    /// Stops the countdown, silences the alert and restores the defaults.
    pub fn reset(&mut self) {
        self.alert.silence();
        self.config = SessionConfig::default();
        self.state = TimerState::new(&self.config);

        info!("Clock reset to defaults");
        self.emit(TimerEvent::Reset);
    }

    /// Advances the countdown by one second.
    ///
    /// When the current phase runs out the alert plays and the clock moves
    /// straight into the next phase, still running. The flip happens in the
    /// same call that consumes the last second, so a running clock never
    /// shows zero.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.is_running() {
            return TickOutcome::Idle;
        }

        if self.state.remaining_seconds > 1 {
            self.state.remaining_seconds -= 1;
            trace!("Tick: {}s left", self.state.remaining_seconds);
            self.emit(TimerEvent::Tick {
                phase: self.state.phase,
                remaining_seconds: self.state.remaining_seconds,
            });
            return TickOutcome::Counted {
                remaining_seconds: self.state.remaining_seconds,
            };
        }

        let finished = self.state.phase;
        let next = finished.next();
        self.state.enter_phase(next, &self.config);
        self.alert.play();

        info!(
            "{} complete, starting {} ({}s)",
            finished.label(),
            next.as_str(),
            self.state.remaining_seconds
        );
        self.emit(TimerEvent::PhaseCompleted { finished, next });

        TickOutcome::PhaseCompleted { finished, next }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Returns the current configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns the current countdown state.
    pub fn state(&self) -> &TimerState {
        &self.state
    }

    /// Returns the collapsed clock state.
    pub fn clock_state(&self) -> ClockState {
        self.state.clock_state()
    }

    /// Returns true if the countdown is advancing.
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Returns an owned view for presentation code.
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot::new(&self.state, &self.config)
    }

    /// Returns a mutable reference to the timer state (for testing).
    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut TimerState {
        &mut self.state
    }

    fn emit(&self, event: TimerEvent) {
        if self.event_tx.send(event).is_err() {
            trace!("No event listener attached");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
