//! Alert playback for the Pomodoro clock.
//!
//! The timer engine only knows about [`Alert`]: "play" when a phase
//! completes and "silence" on reset. Everything behind it is replaceable:
//!
//! ```text
//! ┌──────────────┐     ┌──────────────────────┐     ┌──────────────────┐
//! │    Alert     │────▶│ dyn SoundPlayer      │────▶│ ThreadedSound-   │──▶ audio thread
//! │ (player +    │     │  (Send + Sync)       │     │ Player           │    (RodioSoundPlayer)
//! │  source)     │     │                      │     ├──────────────────┤
//! └──────────────┘     │                      │────▶│ SilentSoundPlayer│
//!                      │                      │     ├──────────────────┤
//!                      │                      │────▶│ MockSoundPlayer  │
//!                      └──────────────────────┘     └──────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pomoclock::sound::{Alert, SoundSource, ThreadedSoundPlayer};
//!
//! let player = ThreadedSoundPlayer::spawn().expect("audio init");
//! let alert = Alert::new(Arc::new(player), SoundSource::default());
//! alert.play();
//! alert.silence();
//! ```

mod error;
mod player;
mod source;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tracing::warn;

pub use error::SoundError;
pub use player::{try_create_player, RodioSoundPlayer, ThreadedSoundPlayer};
pub use source::{
    SoundSource, DEFAULT_BEEP_DURATION_MS, DEFAULT_BEEP_FREQUENCY_HZ, SUPPORTED_EXTENSIONS,
};

/// Trait for sound playback implementations.
///
/// Implementations must be shareable across tasks, since the engine that
/// owns the alert is driven from a spawned ticker.
pub trait SoundPlayer: Send + Sync {
    /// Plays a sound from the given source.
    ///
    /// This method should be non-blocking; the sound plays in the background.
    ///
    /// # Errors
    ///
    /// Returns an error if playback fails.
    fn play(&self, source: &SoundSource) -> Result<(), SoundError>;

    /// Silences any sound that is still playing.
    ///
    /// # Errors
    ///
    /// Returns an error if the player can no longer be reached.
    fn stop(&self) -> Result<(), SoundError>;

    /// Returns true if this player never makes a sound.
    fn is_disabled(&self) -> bool;
}

// ============================================================================
// Alert
// ============================================================================

/// The phase-complete cue: a player bound to the sound it plays.
///
/// Playback failures are logged and swallowed so the timer never observes
/// them.
#[derive(Clone)]
pub struct Alert {
    player: Arc<dyn SoundPlayer>,
    source: SoundSource,
}

impl Alert {
    /// Creates an alert that plays `source` through `player`.
    pub fn new(player: Arc<dyn SoundPlayer>, source: SoundSource) -> Self {
        Self { player, source }
    }

    /// Creates an alert that never makes a sound.
    pub fn silent() -> Self {
        Self::new(Arc::new(SilentSoundPlayer), SoundSource::default())
    }

    /// Starts the cue.
    pub fn play(&self) {
        if let Err(e) = self.player.play(&self.source) {
            warn!("Failed to play alert: {} ({})", e, e.suggestion());
        }
    }

    /// Stops the cue if it is still sounding.
    pub fn silence(&self) {
        if let Err(e) = self.player.stop() {
            warn!("Failed to silence alert: {}", e);
        }
    }

    /// The sound this alert plays.
    pub fn source(&self) -> &SoundSource {
        &self.source
    }
}

impl std::fmt::Debug for Alert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Alert")
            .field("source", &self.source)
            .field("disabled", &self.player.is_disabled())
            .finish()
    }
}

// ============================================================================
// SilentSoundPlayer
// ============================================================================

/// Player used with `--no-sound` or when no audio device exists.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSoundPlayer;

impl SoundPlayer for SilentSoundPlayer {
    fn play(&self, _source: &SoundSource) -> Result<(), SoundError> {
        Ok(())
    }

    fn stop(&self) -> Result<(), SoundError> {
        Ok(())
    }

    fn is_disabled(&self) -> bool {
        true
    }
}

// ============================================================================
// MockSoundPlayer
// ============================================================================

/// Mock sound player for testing.
#[derive(Debug)]
pub struct MockSoundPlayer {
    play_calls: Mutex<Vec<SoundSource>>,
    stop_calls: AtomicUsize,
    should_fail: AtomicBool,
}

impl Default for MockSoundPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSoundPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            play_calls: Mutex::new(Vec::new()),
            stop_calls: AtomicUsize::new(0),
            should_fail: AtomicBool::new(false),
        }
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.lock_calls().len()
    }

    #[must_use]
    pub fn stop_count(&self) -> usize {
        self.stop_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn get_play_calls(&self) -> Vec<SoundSource> {
        self.lock_calls().clone()
    }

    pub fn clear_calls(&self) {
        self.lock_calls().clear();
        self.stop_calls.store(0, Ordering::SeqCst);
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, Vec<SoundSource>> {
        self.play_calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl SoundPlayer for MockSoundPlayer {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SoundError::PlaybackError("Mock failure".to_string()));
        }
        self.lock_calls().push(source.clone());
        Ok(())
    }

    fn stop(&self) -> Result<(), SoundError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SoundError::PlaybackError("Mock failure".to_string()));
        }
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn is_disabled(&self) -> bool {
        false
    }
}
