//! Sound source management.
//!
//! An alert is either a synthesized beep (the default, needs no assets) or
//! a sound file supplied by the user.

use std::path::{Path, PathBuf};

use super::error::SoundError;

/// Frequency of the default beep, in hertz.
pub const DEFAULT_BEEP_FREQUENCY_HZ: u32 = 880;

/// Length of the default beep, in milliseconds.
pub const DEFAULT_BEEP_DURATION_MS: u64 = 1500;

/// Supported audio file extensions (rodio default decoders).
pub const SUPPORTED_EXTENSIONS: &[&str] = &["wav", "mp3", "flac", "ogg"];

/// Represents the source of a sound to be played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundSource {
    /// A sine tone generated at playback time.
    Beep {
        /// Tone frequency in hertz.
        frequency_hz: u32,
        /// Tone length in milliseconds.
        duration_ms: u64,
    },
    /// A sound file on disk.
    File {
        /// Display name (the file stem).
        name: String,
        /// Full path to the sound file.
        path: PathBuf,
    },
}

impl Default for SoundSource {
    fn default() -> Self {
        Self::beep(DEFAULT_BEEP_FREQUENCY_HZ, DEFAULT_BEEP_DURATION_MS)
    }
}

impl SoundSource {
    /// Creates a synthesized beep source.
    #[must_use]
    pub fn beep(frequency_hz: u32, duration_ms: u64) -> Self {
        Self::Beep {
            frequency_hz,
            duration_ms,
        }
    }

    /// Creates a file source without checking the path.
    #[must_use]
    pub fn file(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::File {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Creates a file source after checking that the file exists and has a
    /// supported extension.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::FileNotFound` if `path` is not a regular file and
    /// `SoundError::UnsupportedFormat` if its extension is not one of
    /// [`SUPPORTED_EXTENSIONS`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use pomoclock::sound::SoundSource;
    ///
    /// let source = SoundSource::file_validated("/nonexistent/beep.wav");
    /// assert!(source.is_err());
    /// ```
    pub fn file_validated(path: impl AsRef<Path>) -> Result<Self, SoundError> {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(SoundError::FileNotFound(path.display().to_string()));
        }

        let supported = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()));
        if !supported {
            return Err(SoundError::UnsupportedFormat(path.display().to_string()));
        }

        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "sound".to_string());

        Ok(Self::file(name, path))
    }

    /// Returns the name of the sound source.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Beep { .. } => "beep",
            Self::File { name, .. } => name,
        }
    }

    /// Returns true if this is a synthesized beep.
    #[must_use]
    pub fn is_beep(&self) -> bool {
        matches!(self, Self::Beep { .. })
    }

    /// Returns true if this is a sound file.
    #[must_use]
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File { .. })
    }

    /// Returns the file path if this is a sound file.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File { path, .. } => Some(path),
            Self::Beep { .. } => None,
        }
    }
}
