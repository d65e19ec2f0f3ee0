//! Integration tests for the clock controller.
//!
//! These tests run the real ticker under paused tokio time:
//! - The ticker exists exactly while the clock runs
//! - Elapsed simulated seconds match the countdown
//! - Phase flips happen in real time with the alert
//! - Dropping the controller stops the ticker task

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::sleep;

use pomoclock::clock::{ClockController, TimerEngine, TimerEvent};
use pomoclock::sound::{Alert, MockSoundPlayer, SoundSource};
use pomoclock::types::{ClockState, Phase, SessionConfig};

// ============================================================================
// Test Helpers
// ============================================================================

/// Creates a controller with a recording alert.
fn create_controller(
    config: SessionConfig,
) -> (
    ClockController,
    mpsc::UnboundedReceiver<TimerEvent>,
    Arc<MockSoundPlayer>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let mock = Arc::new(MockSoundPlayer::new());
    let alert = Alert::new(mock.clone(), SoundSource::default());
    let engine = TimerEngine::with_config(config, alert, tx);
    (ClockController::new(engine), rx, mock)
}

fn drain(rx: &mut mpsc::UnboundedReceiver<TimerEvent>) -> Vec<TimerEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

// ============================================================================
// Ticker Lifecycle
// ============================================================================

#[tokio::test(start_paused = true)]
async fn ticker_active_exactly_while_running() {
    let (clock, _rx, _mock) = create_controller(SessionConfig::default());

    assert!(!clock.is_ticking().await);
    clock.start().await;
    assert!(clock.is_ticking().await);
    clock.pause().await;
    assert!(!clock.is_ticking().await);
    clock.toggle().await;
    assert!(clock.is_ticking().await);
    clock.reset().await;
    assert!(!clock.is_ticking().await);
}

#[tokio::test(start_paused = true)]
async fn elapsed_seconds_match_countdown() {
    let (clock, mut rx, _mock) = create_controller(SessionConfig::default());

    clock.start().await;
    sleep(Duration::from_millis(10_500)).await;

    assert_eq!(clock.snapshot().await.remaining_seconds, 1490);
    let ticks = drain(&mut rx)
        .into_iter()
        .filter(|e| matches!(e, TimerEvent::Tick { .. }))
        .count();
    assert_eq!(ticks, 10);
}

#[tokio::test(start_paused = true)]
async fn paused_clock_ignores_elapsed_time() {
    let (clock, _rx, _mock) = create_controller(SessionConfig::default());

    clock.start().await;
    sleep(Duration::from_millis(4500)).await;
    clock.pause().await;
    sleep(Duration::from_secs(600)).await;

    let snapshot = clock.snapshot().await;
    assert_eq!(snapshot.state, ClockState::Paused);
    assert_eq!(snapshot.remaining_seconds, 1496);
}

// ============================================================================
// Phase Flips
// ============================================================================

#[tokio::test(start_paused = true)]
async fn one_minute_session_flips_after_sixty_seconds() {
    let (clock, _rx, mock) = create_controller(SessionConfig::new(1, 1).unwrap());

    clock.start().await;
    sleep(Duration::from_millis(59_500)).await;
    let snapshot = clock.snapshot().await;
    assert_eq!(snapshot.phase, Phase::Work);
    assert_eq!(snapshot.remaining_seconds, 1);
    assert_eq!(mock.play_count(), 0);

    sleep(Duration::from_secs(1)).await;
    let snapshot = clock.snapshot().await;
    assert_eq!(snapshot.phase, Phase::Break);
    assert_eq!(snapshot.remaining_seconds, 60);
    assert_eq!(mock.play_count(), 1);

    sleep(Duration::from_secs(60)).await;
    let snapshot = clock.snapshot().await;
    assert_eq!(snapshot.phase, Phase::Work);
    assert_eq!(snapshot.state, ClockState::Running);
    assert_eq!(mock.play_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn length_change_while_paused_applies_to_next_flip() {
    let (clock, _rx, _mock) = create_controller(SessionConfig::new(1, 1).unwrap());

    clock.start().await;
    sleep(Duration::from_millis(30_500)).await;
    clock.pause().await;
    let snapshot = clock.adjust_break_length(2).await;
    assert_eq!(snapshot.break_minutes, 3);
    assert_eq!(snapshot.remaining_seconds, 30);

    clock.start().await;
    sleep(Duration::from_millis(30_500)).await;

    let snapshot = clock.snapshot().await;
    assert_eq!(snapshot.phase, Phase::Break);
    assert_eq!(snapshot.remaining_seconds, 180);
}

// ============================================================================
// Teardown
// ============================================================================

#[tokio::test(start_paused = true)]
async fn dropping_controller_stops_events() {
    let (clock, mut rx, _mock) = create_controller(SessionConfig::default());

    clock.start().await;
    sleep(Duration::from_millis(2500)).await;
    drop(clock);
    let _ = drain(&mut rx);

    sleep(Duration::from_secs(5)).await;

    // The engine (and its sender) went away with the last handle.
    assert!(rx.recv().await.is_none());
}
