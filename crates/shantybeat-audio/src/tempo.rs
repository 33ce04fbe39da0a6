//! Tempo estimation from onset strength and autocorrelation.
//!
//! The estimator never fails. Input it cannot measure (empty, silent, too
//! short, non-finite or without a periodic pulse) yields
//! [`TempoEstimate::Fallback`] at [`FALLBACK_BPM`] along with the reason, so
//! callers always have a tempo to continue with.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use shantybeat_spec::FALLBACK_BPM;
use tracing::{debug, warn};

use crate::buffer::AudioBuffer;
use crate::error::{AudioError, AudioResult};
use crate::io::load_audio;
use crate::stft::Stft;

/// Why an estimate fell back to the default tempo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// No samples.
    Empty,
    /// Every sample is zero.
    Silent,
    /// NaN or infinite samples.
    NonFinite,
    /// Not enough frames to cover the fastest tempo twice.
    TooShort,
    /// No autocorrelation peak above the noise floor.
    NoPeriodicity,
    /// The file could not be read or decoded.
    Unreadable,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FallbackReason::Empty => "empty input",
            FallbackReason::Silent => "silent input",
            FallbackReason::NonFinite => "non-finite samples",
            FallbackReason::TooShort => "input too short",
            FallbackReason::NoPeriodicity => "no periodic pulse",
            FallbackReason::Unreadable => "unreadable file",
        };
        f.write_str(text)
    }
}

/// Result of tempo estimation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TempoEstimate {
    /// A tempo was measured.
    Detected {
        /// Beats per minute, unrounded and unclamped.
        bpm: f64,
        /// Normalized autocorrelation at the chosen period, in `[0, 1]`.
        strength: f64,
    },
    /// The default tempo was substituted.
    Fallback {
        /// Always [`FALLBACK_BPM`].
        bpm: f64,
        /// What went wrong.
        reason: FallbackReason,
    },
}

impl TempoEstimate {
    /// Builds a fallback estimate.
    pub fn fallback(reason: FallbackReason) -> Self {
        TempoEstimate::Fallback {
            bpm: FALLBACK_BPM,
            reason,
        }
    }

    /// Tempo to use, measured or substituted.
    pub fn bpm(&self) -> f64 {
        match self {
            TempoEstimate::Detected { bpm, .. } | TempoEstimate::Fallback { bpm, .. } => *bpm,
        }
    }

    /// Returns true if the default tempo was substituted.
    pub fn is_fallback(&self) -> bool {
        matches!(self, TempoEstimate::Fallback { .. })
    }

    /// Fallback reason, if any.
    pub fn reason(&self) -> Option<FallbackReason> {
        match self {
            TempoEstimate::Fallback { reason, .. } => Some(*reason),
            TempoEstimate::Detected { .. } => None,
        }
    }

    /// Pulse strength (0.0 for fallbacks).
    pub fn strength(&self) -> f64 {
        match self {
            TempoEstimate::Detected { strength, .. } => *strength,
            TempoEstimate::Fallback { .. } => 0.0,
        }
    }
}

/// Onset-autocorrelation tempo estimator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempoEstimator {
    n_fft: usize,
    hop: usize,
    /// Slowest tempo considered.
    pub min_bpm: f64,
    /// Fastest tempo considered.
    pub max_bpm: f64,
    /// Centre of the log-normal tempo prior.
    pub prior_bpm: f64,
    /// Width of the prior in octaves.
    pub prior_octaves: f64,
    /// Minimum normalized autocorrelation accepted as a pulse.
    pub min_strength: f64,
}

impl Default for TempoEstimator {
    fn default() -> Self {
        Self {
            n_fft: 1024,
            hop: 512,
            min_bpm: 30.0,
            max_bpm: 300.0,
            prior_bpm: 120.0,
            prior_octaves: 1.0,
            min_strength: 0.05,
        }
    }
}

/// Log compression gain applied to magnitudes before differencing.
const LOG_GAIN: f64 = 100.0;

impl TempoEstimator {
    /// Creates an estimator with the given STFT framing and default search
    /// settings.
    ///
    /// `hop` must be non-zero and no larger than `n_fft`.
    pub fn with_framing(n_fft: usize, hop: usize) -> AudioResult<Self> {
        if n_fft == 0 {
            return Err(AudioError::invalid_param("n_fft", "frame size must be non-zero"));
        }
        if hop == 0 || hop > n_fft {
            return Err(AudioError::invalid_param(
                "hop",
                format!("hop must be in 1..={}, got {}", n_fft, hop),
            ));
        }
        Ok(Self {
            n_fft,
            hop,
            ..Self::default()
        })
    }

    /// STFT frame size.
    pub fn n_fft(&self) -> usize {
        self.n_fft
    }

    /// STFT hop size.
    pub fn hop(&self) -> usize {
        self.hop
    }

    /// Estimates the tempo of a buffer.
    pub fn estimate(&self, buffer: &AudioBuffer) -> TempoEstimate {
        match self.measure(buffer) {
            Ok((bpm, strength)) => {
                debug!(bpm, strength, "tempo detected");
                TempoEstimate::Detected { bpm, strength }
            }
            Err(reason) => {
                warn!(%reason, fallback_bpm = FALLBACK_BPM, "tempo estimation fell back");
                TempoEstimate::fallback(reason)
            }
        }
    }

    fn measure(&self, buffer: &AudioBuffer) -> Result<(f64, f64), FallbackReason> {
        if buffer.is_empty() || buffer.sample_rate == 0 {
            return Err(FallbackReason::Empty);
        }
        if buffer.samples.iter().any(|s| !s.is_finite()) {
            return Err(FallbackReason::NonFinite);
        }
        if buffer.is_silent() {
            return Err(FallbackReason::Silent);
        }

        let frame_rate = buffer.sample_rate as f64 / self.hop as f64;
        let min_lag = ((60.0 * frame_rate / self.max_bpm).ceil() as usize).max(1);
        let envelope = self.onset_envelope(&buffer.samples);
        if envelope.len() < 2 * min_lag + 2 {
            return Err(FallbackReason::TooShort);
        }
        let max_lag = ((60.0 * frame_rate / self.min_bpm).floor() as usize)
            .min(envelope.len() - 2)
            .max(min_lag + 1);

        let ac = autocorrelate(&envelope, max_lag + 1);
        if ac[0] <= 0.0 {
            return Err(FallbackReason::NoPeriodicity);
        }

        let weighted: Vec<f64> = (0..=max_lag)
            .map(|lag| {
                if lag < min_lag {
                    return f64::NEG_INFINITY;
                }
                let bpm = 60.0 * frame_rate / lag as f64;
                ac[lag] / ac[0] * self.prior(bpm)
            })
            .collect();

        let best = (min_lag..=max_lag)
            .max_by(|&a, &b| weighted[a].total_cmp(&weighted[b]))
            .ok_or(FallbackReason::TooShort)?;
        let strength = (ac[best] / ac[0]).clamp(0.0, 1.0);
        if strength < self.min_strength {
            return Err(FallbackReason::NoPeriodicity);
        }

        let lag = refine_peak(&weighted, best, min_lag, max_lag);
        Ok((60.0 * frame_rate / lag, strength))
    }

    /// Half-wave rectified log-spectral flux, mean removed.
    fn onset_envelope(&self, samples: &[f64]) -> Vec<f64> {
        let stft = Stft::new(self.n_fft, self.hop);
        let spectra: Vec<Vec<f64>> = stft
            .forward(samples)
            .into_iter()
            .map(|frame| {
                frame
                    .iter()
                    .map(|c| (1.0 + LOG_GAIN * c.norm()).ln())
                    .collect()
            })
            .collect();

        let mut flux: Vec<f64> = spectra
            .windows(2)
            .map(|pair| {
                pair[1]
                    .iter()
                    .zip(&pair[0])
                    .map(|(now, before)| (now - before).max(0.0))
                    .sum()
            })
            .collect();

        if !flux.is_empty() {
            let mean = flux.iter().sum::<f64>() / flux.len() as f64;
            for value in flux.iter_mut() {
                *value -= mean;
            }
        }
        flux
    }

    /// Log-normal weight centred on the prior tempo.
    fn prior(&self, bpm: f64) -> f64 {
        let octaves = (bpm / self.prior_bpm).log2() / self.prior_octaves;
        (-0.5 * octaves * octaves).exp()
    }
}

/// Biased autocorrelation for lags `0..num_lags`.
fn autocorrelate(signal: &[f64], num_lags: usize) -> Vec<f64> {
    (0..num_lags)
        .map(|lag| {
            signal
                .iter()
                .zip(&signal[lag.min(signal.len())..])
                .map(|(a, b)| a * b)
                .sum()
        })
        .collect()
}

/// Parabolic interpolation of a peak at `index`, bounded to half a lag.
fn refine_peak(values: &[f64], index: usize, lo: usize, hi: usize) -> f64 {
    if index <= lo || index >= hi {
        return index as f64;
    }
    let (left, centre, right) = (values[index - 1], values[index], values[index + 1]);
    let denom = left - 2.0 * centre + right;
    if !denom.is_finite() || denom >= 0.0 {
        return index as f64;
    }
    let offset = (0.5 * (left - right) / denom).clamp(-0.5, 0.5);
    index as f64 + offset
}

/// Estimates the tempo of a buffer with default settings.
pub fn estimate_tempo(buffer: &AudioBuffer) -> TempoEstimate {
    TempoEstimator::default().estimate(buffer)
}

/// Loads a file and estimates its tempo.
///
/// A file that cannot be read produces a fallback, not an error.
pub fn estimate_tempo_file(path: &Path) -> TempoEstimate {
    match load_audio(path) {
        Ok(buffer) => estimate_tempo(&buffer),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "could not load audio for tempo estimation");
            TempoEstimate::fallback(FallbackReason::Unreadable)
        }
    }
}
