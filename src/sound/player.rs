//! Sound player implementations using rodio.
//!
//! `RodioSoundPlayer` talks to the audio device directly. Its output stream
//! is not `Send`, so the clock uses `ThreadedSoundPlayer`, which owns a
//! `RodioSoundPlayer` on a dedicated audio thread and forwards commands to
//! it over a channel.

use std::fs::File;
use std::io::BufReader;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use rodio::source::{SineWave, Source};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tracing::{debug, warn};

use super::error::SoundError;
use super::source::SoundSource;
use super::SoundPlayer;

/// Volume applied to the synthesized beep.
const BEEP_AMPLITUDE: f32 = 0.25;

// ============================================================================
// RodioSoundPlayer
// ============================================================================

/// A sound player that uses rodio for audio playback.
///
/// Only one alert plays at a time: starting a new sound replaces the
/// current sink, and [`RodioSoundPlayer::stop`] silences it.
pub struct RodioSoundPlayer {
    /// The audio output stream (must be kept alive for playback).
    _stream: OutputStream,
    /// Handle to the output stream for creating sinks.
    stream_handle: OutputStreamHandle,
    /// Sink of the sound currently playing, if any.
    current: Mutex<Option<Sink>>,
}

impl RodioSoundPlayer {
    /// Creates a new sound player on the default output device.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no audio output device
    /// is available.
    pub fn new() -> Result<Self, SoundError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;

        debug!("Audio output stream initialized");

        Ok(Self {
            _stream: stream,
            stream_handle,
            current: Mutex::new(None),
        })
    }

    /// Plays a sound from the given source.
    ///
    /// This method is non-blocking; the sound plays in the background.
    /// If a sound file cannot be played, it falls back to the default beep.
    ///
    /// # Errors
    ///
    /// Returns an error if the audio sink cannot be created.
    pub fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        match source {
            SoundSource::Beep {
                frequency_hz,
                duration_ms,
            } => {
                debug!("Playing beep: {} Hz for {} ms", frequency_hz, duration_ms);
                self.play_beep(*frequency_hz, *duration_ms)
            }
            SoundSource::File { name, path } => {
                debug!("Playing sound file: {}", name);
                match self.play_file(path) {
                    Ok(()) => Ok(()),
                    Err(e) if e.should_fallback_to_beep() => {
                        warn!(
                            "Failed to play sound file '{}': {}, falling back to beep",
                            name, e
                        );
                        let fallback = SoundSource::default();
                        self.play(&fallback)
                    }
                    Err(e) => Err(e),
                }
            }
        }
    }

    /// Silences the sound currently playing, if any.
    pub fn stop(&self) {
        if let Some(sink) = self.lock_current().take() {
            sink.stop();
            debug!("Sound playback stopped");
        }
    }

    fn play_beep(&self, frequency_hz: u32, duration_ms: u64) -> Result<(), SoundError> {
        let tone = SineWave::new(frequency_hz as f32)
            .take_duration(Duration::from_millis(duration_ms))
            .amplify(BEEP_AMPLITUDE);

        let sink = self.new_sink()?;
        sink.append(tone);
        self.replace_current(sink);
        Ok(())
    }

    fn play_file(&self, path: &std::path::Path) -> Result<(), SoundError> {
        let file = File::open(path)
            .map_err(|e| SoundError::FileNotFound(format!("{}: {}", path.display(), e)))?;

        let decoder = Decoder::new(BufReader::new(file))
            .map_err(|e| SoundError::DecodeError(e.to_string()))?;

        let sink = self.new_sink()?;
        sink.append(decoder);
        self.replace_current(sink);
        Ok(())
    }

    fn new_sink(&self) -> Result<Sink, SoundError> {
        Sink::try_new(&self.stream_handle).map_err(|e| SoundError::StreamError(e.to_string()))
    }

    fn replace_current(&self, sink: Sink) {
        // Dropping the previous sink stops whatever it was playing.
        *self.lock_current() = Some(sink);
        debug!("Sound playback started");
    }

    fn lock_current(&self) -> std::sync::MutexGuard<'_, Option<Sink>> {
        self.current
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl std::fmt::Debug for RodioSoundPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioSoundPlayer")
            .field("playing", &self.lock_current().is_some())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// ThreadedSoundPlayer
// ============================================================================

/// Commands sent to the audio thread.
#[derive(Debug)]
enum AudioCommand {
    Play(SoundSource),
    Stop,
    Shutdown,
}

/// A `Send + Sync` player that drives a [`RodioSoundPlayer`] living on its
/// own thread.
pub struct ThreadedSoundPlayer {
    tx: Sender<AudioCommand>,
    thread: Option<JoinHandle<()>>,
}

impl ThreadedSoundPlayer {
    /// Starts the audio thread and opens the output device on it.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if the device cannot be
    /// opened, and `SoundError::PlaybackError` if the thread cannot start.
    pub fn spawn() -> Result<Self, SoundError> {
        let (tx, rx) = crossbeam_channel::unbounded();
        let (ready_tx, ready_rx) = crossbeam_channel::bounded(1);

        let thread = std::thread::Builder::new()
            .name("pomoclock-audio".to_string())
            .spawn(move || audio_thread_main(rx, ready_tx))
            .map_err(|e| SoundError::PlaybackError(format!("failed to start audio thread: {}", e)))?;

        ready_rx.recv().map_err(|_| {
            SoundError::DeviceNotAvailable("audio thread exited during startup".to_string())
        })??;

        Ok(Self {
            tx,
            thread: Some(thread),
        })
    }

    fn send(&self, command: AudioCommand) -> Result<(), SoundError> {
        self.tx
            .send(command)
            .map_err(|_| SoundError::PlaybackError("audio thread is not running".to_string()))
    }
}

fn audio_thread_main(rx: Receiver<AudioCommand>, ready_tx: Sender<Result<(), SoundError>>) {
    let player = match RodioSoundPlayer::new() {
        Ok(player) => {
            let _ = ready_tx.send(Ok(()));
            player
        }
        Err(e) => {
            let _ = ready_tx.send(Err(e));
            return;
        }
    };

    for command in rx.iter() {
        match command {
            AudioCommand::Play(source) => {
                if let Err(e) = player.play(&source) {
                    warn!("Alert playback failed: {} ({})", e, e.suggestion());
                }
            }
            AudioCommand::Stop => player.stop(),
            AudioCommand::Shutdown => break,
        }
    }

    debug!("Audio thread finished");
}

impl SoundPlayer for ThreadedSoundPlayer {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        self.send(AudioCommand::Play(source.clone()))
    }

    fn stop(&self) -> Result<(), SoundError> {
        self.send(AudioCommand::Stop)
    }

    fn is_disabled(&self) -> bool {
        false
    }
}

impl Drop for ThreadedSoundPlayer {
    fn drop(&mut self) {
        let _ = self.tx.send(AudioCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl std::fmt::Debug for ThreadedSoundPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadedSoundPlayer")
            .field("running", &self.thread.as_ref().is_some_and(|t| !t.is_finished()))
            .finish_non_exhaustive()
    }
}

/// Creates a threaded sound player, returning None if audio is unavailable.
///
/// If audio initialization fails, a warning is logged and None is returned.
#[must_use]
pub fn try_create_player() -> Option<Arc<ThreadedSoundPlayer>> {
    match ThreadedSoundPlayer::spawn() {
        Ok(player) => Some(Arc::new(player)),
        Err(e) => {
            warn!("Audio not available, sound disabled: {}", e);
            None
        }
    }
}
