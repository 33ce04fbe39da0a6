//! Tempo stretching and sample-rate conversion.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use rustfft::num_complex::Complex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::buffer::AudioBuffer;
use crate::error::{AudioError, AudioResult};
use crate::stft::Stft;

const VOCODER_N_FFT: usize = 2048;
const VOCODER_HOP: usize = 512;

/// How to change the tempo of a buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StretchMethod {
    /// Phase vocoder; pitch is preserved.
    #[default]
    PhaseVocoder,
    /// Linear-interpolation resampling; pitch moves with tempo.
    Resample,
}

impl fmt::Display for StretchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StretchMethod::PhaseVocoder => "phase_vocoder",
            StretchMethod::Resample => "resample",
        })
    }
}

impl FromStr for StretchMethod {
    type Err = AudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "phase_vocoder" | "vocoder" => Ok(StretchMethod::PhaseVocoder),
            "resample" => Ok(StretchMethod::Resample),
            other => Err(AudioError::invalid_param(
                "method",
                format!("unknown stretch method '{}'", other),
            )),
        }
    }
}

/// Changes the tempo of `buffer` from `original_bpm` to `target_bpm`.
///
/// # Arguments
/// * `buffer` - Audio recorded at `original_bpm`
/// * `original_bpm` - Tempo of `buffer`
/// * `target_bpm` - Wanted tempo
/// * `method` - Phase vocoder keeps pitch, resampling shifts it
///
/// # Returns
/// A buffer of `round(len / ratio)` samples with `ratio = target / original`
pub fn stretch_to_tempo(
    buffer: &AudioBuffer,
    original_bpm: f64,
    target_bpm: f64,
    method: StretchMethod,
) -> AudioResult<AudioBuffer> {
    for bpm in [original_bpm, target_bpm] {
        if !bpm.is_finite() || bpm <= 0.0 {
            return Err(AudioError::InvalidTempo { bpm });
        }
    }

    let ratio = target_bpm / original_bpm;
    debug!(original_bpm, target_bpm, ratio, %method, "stretching");
    stretch_by(buffer, ratio, method)
}

/// Speeds `buffer` up by `ratio` (values below 1.0 slow it down).
pub fn stretch_by(buffer: &AudioBuffer, ratio: f64, method: StretchMethod) -> AudioResult<AudioBuffer> {
    if !ratio.is_finite() || ratio <= 0.0 {
        return Err(AudioError::invalid_param(
            "ratio",
            format!("stretch ratio must be positive, got {}", ratio),
        ));
    }

    let out_len = (buffer.len() as f64 / ratio).round() as usize;
    if buffer.is_empty() || out_len == 0 {
        return Ok(AudioBuffer::zeros(0, buffer.sample_rate));
    }
    if ratio == 1.0 {
        return Ok(buffer.clone());
    }

    let samples = match method {
        StretchMethod::PhaseVocoder => phase_vocoder(&buffer.samples, ratio, out_len),
        StretchMethod::Resample => interpolate(&buffer.samples, ratio, out_len),
    };
    Ok(AudioBuffer::new(samples, buffer.sample_rate))
}

/// Converts `buffer` to `new_rate` by linear interpolation.
pub fn resample(buffer: &AudioBuffer, new_rate: u32) -> AudioResult<AudioBuffer> {
    if new_rate == 0 {
        return Err(AudioError::InvalidSampleRate { rate: new_rate });
    }
    if buffer.sample_rate == new_rate {
        return Ok(buffer.clone());
    }
    if buffer.sample_rate == 0 {
        return Err(AudioError::InvalidSampleRate {
            rate: buffer.sample_rate,
        });
    }

    let step = buffer.sample_rate as f64 / new_rate as f64;
    let out_len = (buffer.len() as f64 / step).round() as usize;
    Ok(AudioBuffer::new(
        interpolate(&buffer.samples, step, out_len),
        new_rate,
    ))
}

/// Reads `samples` at positions `i * step`, interpolating linearly.
fn interpolate(samples: &[f64], step: f64, out_len: usize) -> Vec<f64> {
    let last = samples.len().saturating_sub(1);
    (0..out_len)
        .map(|i| {
            let pos = i as f64 * step;
            let idx = pos.floor() as usize;
            if idx >= last {
                return samples.get(last).copied().unwrap_or(0.0);
            }
            let frac = pos - idx as f64;
            samples[idx] * (1.0 - frac) + samples[idx + 1] * frac
        })
        .collect()
}

fn wrap_phase(phase: f64) -> f64 {
    phase - 2.0 * PI * (phase / (2.0 * PI)).round()
}

/// Time-scales by reading STFT frames at fractional steps of `rate`,
/// interpolating magnitudes and accumulating phase advances.
fn phase_vocoder(samples: &[f64], rate: f64, out_len: usize) -> Vec<f64> {
    let stft = Stft::new(VOCODER_N_FFT, VOCODER_HOP);
    let mut frames = stft.forward(samples);
    if frames.is_empty() {
        return vec![0.0; out_len];
    }
    let bins = stft.num_bins();
    frames.push(vec![Complex::new(0.0, 0.0); bins]);

    let expected_advance: Vec<f64> = (0..bins)
        .map(|k| 2.0 * PI * k as f64 * VOCODER_HOP as f64 / VOCODER_N_FFT as f64)
        .collect();
    let mut phase: Vec<f64> = frames[0].iter().map(|c| c.arg()).collect();

    let source_frames = frames.len() - 1;
    let mut output = Vec::new();
    let mut step = 0.0;
    while step < source_frames as f64 {
        let left = step.floor() as usize;
        let alpha = step - left as f64;
        let (a, b) = (&frames[left], &frames[left + 1]);

        let frame: Vec<Complex<f64>> = (0..bins)
            .map(|k| {
                let magnitude = (1.0 - alpha) * a[k].norm() + alpha * b[k].norm();
                Complex::from_polar(magnitude, phase[k])
            })
            .collect();
        output.push(frame);

        for k in 0..bins {
            let deviation = b[k].arg() - a[k].arg() - expected_advance[k];
            phase[k] += expected_advance[k] + wrap_phase(deviation);
        }
        step += rate;
    }

    stft.inverse(&output, out_len)
}
