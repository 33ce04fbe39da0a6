//! Mono sample buffer shared by every processing stage.

use crate::error::{AudioError, AudioResult};

/// Mono audio at a fixed sample rate.
///
/// Samples are `f64` and nominally lie in `[-1.0, 1.0]` once normalized.
/// Synthesis intermediates may exceed that range.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    /// Audio samples.
    pub samples: Vec<f64>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl AudioBuffer {
    /// Wraps existing samples.
    pub fn new(samples: Vec<f64>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Creates a zeroed buffer of `num_samples` samples.
    pub fn zeros(num_samples: usize, sample_rate: u32) -> Self {
        Self::new(vec![0.0; num_samples], sample_rate)
    }

    /// Creates a silent buffer covering `duration` seconds (truncated to whole samples).
    pub fn silent(duration: f64, sample_rate: u32) -> Self {
        Self::zeros(samples_for(duration, sample_rate), sample_rate)
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Length in seconds.
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Largest absolute sample value.
    pub fn peak(&self) -> f64 {
        peak(&self.samples)
    }

    /// Returns true if every sample is exactly zero.
    pub fn is_silent(&self) -> bool {
        self.samples.iter().all(|&s| s == 0.0)
    }

    /// Multiplies every sample by `gain`.
    pub fn scale(&mut self, gain: f64) {
        for sample in self.samples.iter_mut() {
            *sample *= gain;
        }
    }

    /// Rescales so the peak equals `ceiling`.
    ///
    /// Silent buffers are left untouched. Returns whether a gain was applied.
    pub fn normalize_peak(&mut self, ceiling: f64) -> bool {
        let current = self.peak();
        if current > 0.0 {
            self.scale(ceiling / current);
            true
        } else {
            false
        }
    }

    /// Adds `weight * other` sample-wise over the overlapping range.
    pub fn mix_in(&mut self, other: &[f64], weight: f64) {
        for (dst, &src) in self.samples.iter_mut().zip(other) {
            *dst += src * weight;
        }
    }

    /// Adds a scheduled event at `offset`.
    ///
    /// The event is dropped (returns `false`) when its window would reach the
    /// end of the buffer, so a voice never writes out of bounds.
    pub fn add_event(&mut self, offset: usize, event: &[f64], gain: f64) -> bool {
        if offset + event.len() >= self.samples.len() {
            return false;
        }
        for (dst, &src) in self.samples[offset..offset + event.len()]
            .iter_mut()
            .zip(event)
        {
            *dst += src * gain;
        }
        true
    }

    /// Fails with a synthesis error if any sample is NaN or infinite.
    pub fn ensure_finite(&self, stage: &str) -> AudioResult<()> {
        match self.samples.iter().position(|s| !s.is_finite()) {
            Some(index) => Err(AudioError::synthesis(format!(
                "{} produced a non-finite sample at index {}",
                stage, index
            ))),
            None => Ok(()),
        }
    }

    /// Consumes the buffer, returning its samples.
    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }
}

/// Number of whole samples covering `duration` seconds.
pub fn samples_for(duration: f64, sample_rate: u32) -> usize {
    if !duration.is_finite() || duration <= 0.0 {
        return 0;
    }
    (duration * sample_rate as f64) as usize
}

/// Largest absolute value in a slice.
pub fn peak(samples: &[f64]) -> f64 {
    samples
        .iter()
        .map(|s| s.abs())
        .fold(0.0_f64, |a, b| a.max(b))
}
