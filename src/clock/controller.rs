//! Async driver for the timer engine.
//!
//! [`ClockController`] owns a [`TimerEngine`] behind a mutex and runs a
//! once-per-second ticker task while the countdown is running. Commands
//! and ticks are serialized through the same lock, so a tick never
//! observes a half-applied command.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, trace};

use super::engine::{TickOutcome, TimerEngine};
use crate::types::TimerSnapshot;

/// Default period between ticks.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

// ============================================================================
// TickerGuard
// ============================================================================

/// Handle to a running ticker task; aborts the task when dropped.
#[derive(Debug)]
struct TickerGuard {
    handle: JoinHandle<()>,
}

impl Drop for TickerGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// ============================================================================
// ClockController
// ============================================================================

#[derive(Debug)]
struct ClockInner {
    engine: TimerEngine,
    ticker: Option<TickerGuard>,
    /// Bumped on every ticker spawn; a task whose generation is stale exits.
    generation: u64,
}

/// Cloneable handle that drives a [`TimerEngine`] in real time.
#[derive(Debug, Clone)]
pub struct ClockController {
    inner: Arc<Mutex<ClockInner>>,
    tick_interval: Duration,
}

impl ClockController {
    /// Wraps an engine with the default one-second tick.
    pub fn new(engine: TimerEngine) -> Self {
        Self::with_tick_interval(engine, TICK_INTERVAL)
    }

    /// Wraps an engine with a custom tick period.
    pub fn with_tick_interval(engine: TimerEngine, tick_interval: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ClockInner {
                engine,
                ticker: None,
                generation: 0,
            })),
            tick_interval,
        }
    }

    /// Starts or resumes the countdown.
    pub async fn start(&self) -> TimerSnapshot {
        self.apply(TimerEngine::start).await
    }

    /// Pauses the countdown.
    pub async fn pause(&self) -> TimerSnapshot {
        self.apply(TimerEngine::pause).await
    }

    /// Starts if stopped or paused, pauses if running.
    pub async fn toggle(&self) -> TimerSnapshot {
        self.apply(TimerEngine::toggle).await
    }

    /// Restores the defaults and stops the ticker.
    pub async fn reset(&self) -> TimerSnapshot {
        self.apply(TimerEngine::reset).await
    }

    /// Sets the work session length (ignored while running or out of range).
    pub async fn set_session_length(&self, minutes: i64) -> TimerSnapshot {
        self.apply(|engine| engine.set_session_length(minutes)).await
    }

    /// Sets the break length (ignored while running or out of range).
    pub async fn set_break_length(&self, minutes: i64) -> TimerSnapshot {
        self.apply(|engine| engine.set_break_length(minutes)).await
    }

    /// Nudges the work session length by `delta` minutes.
    pub async fn adjust_session_length(&self, delta: i64) -> TimerSnapshot {
        self.apply(|engine| engine.adjust_session_length(delta)).await
    }

    /// Nudges the break length by `delta` minutes.
    pub async fn adjust_break_length(&self, delta: i64) -> TimerSnapshot {
        self.apply(|engine| engine.adjust_break_length(delta)).await
    }

    /// Returns the current state of the clock.
    pub async fn snapshot(&self) -> TimerSnapshot {
        self.inner.lock().await.engine.snapshot()
    }

    /// Returns true while a ticker task is attached.
    pub async fn is_ticking(&self) -> bool {
        self.inner.lock().await.ticker.is_some()
    }

    async fn apply<F>(&self, command: F) -> TimerSnapshot
    where
        F: FnOnce(&mut TimerEngine),
    {
        let mut inner = self.inner.lock().await;
        command(&mut inner.engine);
        self.sync_ticker(&mut inner);
        inner.engine.snapshot()
    }

    /// Attaches a ticker while the engine runs and drops it otherwise.
    fn sync_ticker(&self, inner: &mut ClockInner) {
        match (inner.engine.is_running(), inner.ticker.is_some()) {
            (true, false) => {
                inner.generation = inner.generation.wrapping_add(1);
                let handle = tokio::spawn(run_ticker(
                    Arc::downgrade(&self.inner),
                    inner.generation,
                    self.tick_interval,
                ));
                inner.ticker = Some(TickerGuard { handle });
                debug!("Ticker started (generation {})", inner.generation);
            }
            (false, true) => {
                inner.ticker = None;
                debug!("Ticker stopped");
            }
            _ => {}
        }
    }
}

async fn run_ticker(inner: Weak<Mutex<ClockInner>>, generation: u64, period: Duration) {
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;

        let Some(shared) = inner.upgrade() else {
            break;
        };
        let mut guard = shared.lock().await;
        if guard.generation != generation {
            break;
        }

        if guard.engine.tick() == TickOutcome::Idle {
            trace!("Ticker found the clock idle");
            guard.ticker = None;
            break;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
