//! Measuring beat files before they enter the catalog.

use std::path::Path;

use shantybeat_audio::{load_audio, TempoEstimator};
use tracing::{debug, warn};

use crate::error::{CatalogError, CatalogResult};

/// Tempo and length of one beat file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeatMeasurement {
    /// Estimated tempo.
    pub bpm: f64,
    /// Length in seconds.
    pub duration: f64,
}

/// Measures audio files for the catalog.
pub trait BeatAnalyzer {
    /// Estimates tempo and duration of the file at `path`.
    fn measure(&self, path: &Path) -> CatalogResult<BeatMeasurement>;

    /// Length of the file at `path` in seconds.
    fn duration(&self, path: &Path) -> CatalogResult<f64> {
        self.measure(path).map(|m| m.duration)
    }
}

/// Decodes the file and runs the onset tempo estimator on it.
#[derive(Debug, Clone, Default)]
pub struct TempoAnalyzer {
    estimator: TempoEstimator,
}

impl TempoAnalyzer {
    /// Uses a custom estimator.
    pub fn new(estimator: TempoEstimator) -> Self {
        Self { estimator }
    }
}

impl BeatAnalyzer for TempoAnalyzer {
    fn measure(&self, path: &Path) -> CatalogResult<BeatMeasurement> {
        let buffer = load_audio(path).map_err(|e| CatalogError::Analysis {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let estimate = self.estimator.estimate(&buffer);
        if estimate.is_fallback() {
            warn!(path = %path.display(), bpm = estimate.bpm(), "no tempo found, recording fallback");
        }
        let measurement = BeatMeasurement {
            bpm: estimate.bpm(),
            duration: buffer.duration_seconds(),
        };
        debug!(
            path = %path.display(),
            bpm = measurement.bpm,
            duration = measurement.duration,
            "measured beat"
        );
        Ok(measurement)
    }

    fn duration(&self, path: &Path) -> CatalogResult<f64> {
        load_audio(path)
            .map(|buffer| buffer.duration_seconds())
            .map_err(|e| CatalogError::Analysis {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
    }
}
