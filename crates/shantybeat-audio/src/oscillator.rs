//! Additive and noise building blocks shared by the voices.

use std::f64::consts::PI;

use rand_pcg::Pcg32;

use crate::rng::gaussian;

/// A single sine partial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Partial {
    /// Frequency in Hz.
    pub frequency: f64,
    /// Linear amplitude.
    pub amplitude: f64,
    /// Exponential decay rate (0.0 for a sustained partial).
    pub decay: f64,
}

impl Partial {
    /// Creates a sustained partial.
    pub const fn new(frequency: f64, amplitude: f64) -> Self {
        Self {
            frequency,
            amplitude,
            decay: 0.0,
        }
    }

    /// Creates a partial with its own exponential decay.
    pub const fn decaying(frequency: f64, amplitude: f64, decay: f64) -> Self {
        Self {
            frequency,
            amplitude,
            decay,
        }
    }

    /// Value at time `t` seconds.
    #[inline]
    pub fn at(&self, t: f64) -> f64 {
        let tone = (2.0 * PI * self.frequency * t).sin() * self.amplitude;
        if self.decay > 0.0 {
            tone * (-self.decay * t).exp()
        } else {
            tone
        }
    }
}

/// Renders a sum of partials for `num_samples` samples.
pub fn additive(partials: &[Partial], num_samples: usize, sample_rate: u32) -> Vec<f64> {
    let sr = sample_rate as f64;
    (0..num_samples)
        .map(|i| {
            let t = i as f64 / sr;
            partials.iter().map(|p| p.at(t)).sum()
        })
        .collect()
}

/// Renders a pure sine tone.
pub fn sine(frequency: f64, num_samples: usize, sample_rate: u32) -> Vec<f64> {
    additive(&[Partial::new(frequency, 1.0)], num_samples, sample_rate)
}

/// Draws `num_samples` gaussian samples scaled by `amplitude`.
pub fn gaussian_noise(num_samples: usize, amplitude: f64, rng: &mut Pcg32) -> Vec<f64> {
    (0..num_samples).map(|_| gaussian(rng) * amplitude).collect()
}

/// Moving-average filter with a centred window, keeping the input length.
///
/// Samples outside the signal count as zero, so the edges taper.
pub fn boxcar(signal: &[f64], width: usize) -> Vec<f64> {
    if width <= 1 || signal.is_empty() {
        return signal.to_vec();
    }

    let mut prefix = Vec::with_capacity(signal.len() + 1);
    prefix.push(0.0);
    let mut running = 0.0;
    for &s in signal {
        running += s;
        prefix.push(running);
    }

    let n = signal.len() as isize;
    let w = width as isize;
    let shift = (w - 1) / 2;
    (0..n)
        .map(|i| {
            // Window of the full convolution at index i + shift.
            let end = (i + shift).min(n - 1);
            let start = (i + shift - w + 1).max(0);
            if end < start {
                return 0.0;
            }
            (prefix[(end + 1) as usize] - prefix[start as usize]) / width as f64
        })
        .collect()
}

/// Slow sinusoidal swell `offset + depth * sin(2π·rate·t)` over `num_samples`.
pub fn lfo(rate: f64, offset: f64, depth: f64, num_samples: usize, sample_rate: u32) -> Vec<f64> {
    let sr = sample_rate as f64;
    (0..num_samples)
        .map(|i| offset + depth * (2.0 * PI * rate * i as f64 / sr).sin())
        .collect()
}
