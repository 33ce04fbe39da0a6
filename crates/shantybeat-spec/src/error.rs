//! Error types shared across the workspace.

use thiserror::Error;

/// Result type for spec-level operations.
pub type SpecResult<T> = Result<T, SpecError>;

/// Errors raised while parsing or validating domain values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SpecError {
    /// Theme tag not present in the theme table.
    #[error("unknown theme '{0}'")]
    UnknownTheme(String),

    /// Mood tag not recognized.
    #[error("unknown mood '{0}'")]
    UnknownMood(String),

    /// Instrument tag not recognized.
    #[error("unknown instrument '{0}'")]
    UnknownInstrument(String),

    /// Energy outside of `[0.0, 1.0]` or not finite.
    #[error("energy must be within 0.0..=1.0, got {0}")]
    InvalidEnergy(f64),

    /// Tempo band with `min >= max` or non-positive bounds.
    #[error("invalid tempo band {min}..{max}")]
    InvalidTempoBand {
        /// Lower bound in BPM.
        min: f64,
        /// Upper bound in BPM.
        max: f64,
    },
}

/// Common reporting interface for errors from every shantybeat crate.
///
/// Each crate's error enum implements this so the CLI can print a stable code
/// and group failures by category without knowing the concrete type.
///
/// # Example
///
/// ```ignore
/// use shantybeat_spec::BackendError;
///
/// fn report<E: BackendError>(err: &E) {
///     eprintln!("[{}] {}", err.code(), err.message());
/// }
/// ```
pub trait BackendError: std::error::Error {
    /// Stable error code such as `"AUDIO_003"` or `"CATALOG_001"`.
    fn code(&self) -> &'static str;

    /// Human-readable message; defaults to the `Display` output.
    fn message(&self) -> String {
        self.to_string()
    }

    /// Error category such as `"audio"` or `"catalog"`.
    fn category(&self) -> &'static str;
}

impl BackendError for SpecError {
    fn code(&self) -> &'static str {
        match self {
            SpecError::UnknownTheme(_) => "SPEC_001",
            SpecError::UnknownMood(_) => "SPEC_002",
            SpecError::UnknownInstrument(_) => "SPEC_003",
            SpecError::InvalidEnergy(_) => "SPEC_004",
            SpecError::InvalidTempoBand { .. } => "SPEC_005",
        }
    }

    fn category(&self) -> &'static str {
        "spec"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            SpecError::UnknownTheme("x".into()),
            SpecError::UnknownMood("x".into()),
            SpecError::UnknownInstrument("x".into()),
            SpecError::InvalidEnergy(2.0),
            SpecError::InvalidTempoBand { min: 1.0, max: 0.0 },
        ];
        let mut codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_message_matches_display() {
        let err = SpecError::InvalidEnergy(1.5);
        assert_eq!(err.message(), err.to_string());
        assert!(err.message().contains("1.5"));
        assert_eq!(err.category(), "spec");
    }
}
