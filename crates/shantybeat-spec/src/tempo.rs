//! Tempo band used to constrain detected tempos before matching or generation.

use serde::{Deserialize, Serialize};

use crate::error::{SpecError, SpecResult};

/// Tempo reported when estimation cannot produce a confident result.
///
/// Midpoint of the default shanty band.
pub const FALLBACK_BPM: f64 = 95.0;

/// Inclusive BPM range accepted for matching and synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TempoBand {
    /// Lowest accepted tempo.
    pub min: f64,
    /// Highest accepted tempo.
    pub max: f64,
}

impl Default for TempoBand {
    fn default() -> Self {
        Self {
            min: 90.0,
            max: 110.0,
        }
    }
}

impl TempoBand {
    /// Creates a validated band.
    pub fn new(min: f64, max: f64) -> SpecResult<Self> {
        let band = Self { min, max };
        band.validate()?;
        Ok(band)
    }

    /// Checks `0 < min < max` with finite bounds.
    pub fn validate(&self) -> SpecResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min <= 0.0 || self.min >= self.max
        {
            return Err(SpecError::InvalidTempoBand {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    /// Clamps a tempo into the band.
    ///
    /// Non-finite input maps to the band midpoint.
    pub fn clamp(&self, bpm: f64) -> f64 {
        if !bpm.is_finite() {
            return self.midpoint();
        }
        bpm.clamp(self.min, self.max)
    }

    /// Returns true if `bpm` lies inside the band.
    pub fn contains(&self, bpm: f64) -> bool {
        bpm >= self.min && bpm <= self.max
    }

    /// Centre of the band.
    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) * 0.5
    }
}
