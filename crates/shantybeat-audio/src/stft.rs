//! Short-time Fourier transform and its overlap-add inverse.

use std::f64::consts::PI;
use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

/// Periodic Hann window of length `n`.
pub fn hann(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f64 / n as f64).cos()))
        .collect()
}

/// Frame geometry plus cached FFT plans.
pub struct Stft {
    n_fft: usize,
    hop: usize,
    window: Vec<f64>,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
}

impl std::fmt::Debug for Stft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stft")
            .field("n_fft", &self.n_fft)
            .field("hop", &self.hop)
            .finish()
    }
}

impl Stft {
    /// Plans transforms for the given frame size and hop.
    pub fn new(n_fft: usize, hop: usize) -> Self {
        let mut planner = FftPlanner::<f64>::new();
        Self {
            n_fft,
            hop,
            window: hann(n_fft),
            forward: planner.plan_fft_forward(n_fft),
            inverse: planner.plan_fft_inverse(n_fft),
        }
    }

    /// Frame size in samples.
    pub fn n_fft(&self) -> usize {
        self.n_fft
    }

    /// Hop size in samples.
    pub fn hop(&self) -> usize {
        self.hop
    }

    /// Number of non-negative frequency bins per frame.
    pub fn num_bins(&self) -> usize {
        self.n_fft / 2 + 1
    }

    /// Windowed spectra of a centred (zero-padded by `n_fft / 2`) signal.
    pub fn forward(&self, signal: &[f64]) -> Vec<Vec<Complex<f64>>> {
        let pad = self.n_fft / 2;
        let mut padded = vec![0.0; signal.len() + 2 * pad];
        padded[pad..pad + signal.len()].copy_from_slice(signal);

        if padded.len() < self.n_fft {
            return Vec::new();
        }
        let num_frames = 1 + (padded.len() - self.n_fft) / self.hop;

        let mut scratch = vec![Complex::new(0.0, 0.0); self.n_fft];
        (0..num_frames)
            .map(|frame| {
                let start = frame * self.hop;
                for (i, slot) in scratch.iter_mut().enumerate() {
                    *slot = Complex::new(padded[start + i] * self.window[i], 0.0);
                }
                self.forward.process(&mut scratch);
                scratch[..self.num_bins()].to_vec()
            })
            .collect()
    }

    /// Overlap-adds frames back to a signal of exactly `length` samples.
    ///
    /// Each frame is windowed again and the sum is divided by the summed
    /// squared window wherever that is non-negligible.
    pub fn inverse(&self, frames: &[Vec<Complex<f64>>], length: usize) -> Vec<f64> {
        let pad = self.n_fft / 2;
        let total = self.n_fft + self.hop * frames.len().saturating_sub(1);
        let mut out = vec![0.0; total.max(pad + length)];
        let mut norm = vec![0.0; out.len()];

        let mut scratch = vec![Complex::new(0.0, 0.0); self.n_fft];
        let scale = 1.0 / self.n_fft as f64;
        for (frame_idx, bins) in frames.iter().enumerate() {
            for (k, slot) in scratch.iter_mut().enumerate() {
                *slot = if k < bins.len() {
                    bins[k]
                } else {
                    bins[self.n_fft - k].conj()
                };
            }
            self.inverse.process(&mut scratch);

            let start = frame_idx * self.hop;
            for i in 0..self.n_fft {
                let w = self.window[i];
                out[start + i] += scratch[i].re * scale * w;
                norm[start + i] += w * w;
            }
        }

        for (sample, n) in out.iter_mut().zip(&norm) {
            if *n > 1e-10 {
                *sample /= n;
            }
        }
        out.into_iter().skip(pad).take(length).collect()
    }
}
