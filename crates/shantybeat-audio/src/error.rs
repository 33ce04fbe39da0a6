//! Error types for the audio backend.

use std::path::PathBuf;

use shantybeat_spec::BackendError;
use thiserror::Error;

/// Result type for audio operations.
pub type AudioResult<T> = Result<T, AudioError>;

/// Errors that can occur while synthesizing, stretching, mixing or writing audio.
#[derive(Debug, Error)]
pub enum AudioError {
    /// Invalid sample rate.
    #[error("invalid sample rate: {rate}")]
    InvalidSampleRate {
        /// The invalid sample rate.
        rate: u32,
    },

    /// Invalid duration.
    #[error("invalid duration: {duration} seconds")]
    InvalidDuration {
        /// The invalid duration.
        duration: f64,
    },

    /// Invalid tempo.
    #[error("invalid tempo: {bpm} BPM")]
    InvalidTempo {
        /// The invalid tempo.
        bpm: f64,
    },

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Error message.
        message: String,
    },

    /// Synthesis produced unusable output (NaN, infinity, empty theme).
    #[error("synthesis error: {message}")]
    Synthesis {
        /// Error message.
        message: String,
    },

    /// File system failure.
    #[error("I/O error during {operation} of '{}': {source}", path.display())]
    Io {
        /// What was being attempted ("read", "write", ...).
        operation: &'static str,
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// WAV container could not be read or written.
    #[error("WAV error in '{}': {source}", path.display())]
    Wav {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: hound::Error,
    },

    /// Compressed input could not be decoded.
    #[error("decode error in '{}': {message}", path.display())]
    Decode {
        /// File involved.
        path: PathBuf,
        /// Decoder message.
        message: String,
    },
}

impl AudioError {
    /// Creates an invalid parameter error.
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a synthesis error.
    pub fn synthesis(message: impl Into<String>) -> Self {
        Self::Synthesis {
            message: message.into(),
        }
    }

    /// Creates an I/O error with path context.
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}

impl BackendError for AudioError {
    fn code(&self) -> &'static str {
        match self {
            AudioError::InvalidSampleRate { .. } => "AUDIO_001",
            AudioError::InvalidDuration { .. } => "AUDIO_002",
            AudioError::InvalidTempo { .. } => "AUDIO_003",
            AudioError::InvalidParameter { .. } => "AUDIO_004",
            AudioError::Synthesis { .. } => "AUDIO_005",
            AudioError::Io { .. } => "AUDIO_006",
            AudioError::Wav { .. } => "AUDIO_007",
            AudioError::Decode { .. } => "AUDIO_008",
        }
    }

    fn category(&self) -> &'static str {
        "audio"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_param_helper() {
        let err = AudioError::invalid_param("gain", "must be finite");
        assert!(err.to_string().contains("gain"));
        assert!(err.to_string().contains("must be finite"));
        assert_eq!(err.code(), "AUDIO_004");
    }

    #[test]
    fn test_io_error_carries_path_and_operation() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = AudioError::io("read", "/tmp/vocal.wav", source);
        let text = err.to_string();
        assert!(text.contains("read"));
        assert!(text.contains("/tmp/vocal.wav"));
        assert_eq!(err.category(), "audio");
    }
}
