//! Continuous beds: rolling wave noise and a low drone.

use rand_pcg::Pcg32;

use super::{Voice, VoiceContext};
use crate::buffer::AudioBuffer;
use crate::oscillator::{additive, boxcar, gaussian_noise, lfo, Partial};

const WAVE_NOISE: f64 = 0.15;
const WAVE_SMOOTHING: f64 = 0.1;
const WAVE_SWELL_RATE: f64 = 0.3;
const WAVE_GAIN: f64 = 0.4;

/// A1, E2, A2.
const DRONE_PARTIALS: [Partial; 3] = [
    Partial::new(55.0, 0.3),
    Partial::new(82.5, 0.2),
    Partial::new(110.0, 0.15),
];
const DRONE_LFO_RATE: f64 = 0.2;
const DRONE_GAIN: f64 = 0.15;

/// Smoothed noise with a slow swell.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Waves;

impl Voice for Waves {
    fn name(&self) -> &'static str {
        "waves"
    }

    fn render(&self, ctx: &VoiceContext, rng: &mut Pcg32) -> AudioBuffer {
        let n = ctx.num_samples();
        let noise = gaussian_noise(n, WAVE_NOISE, rng);
        let smoothed = boxcar(&noise, ctx.event_len(WAVE_SMOOTHING));
        let swell = lfo(WAVE_SWELL_RATE, 0.5, 0.5, n, ctx.sample_rate);

        let samples = smoothed
            .into_iter()
            .zip(swell)
            .map(|(s, m)| s * m * WAVE_GAIN)
            .collect();
        AudioBuffer::new(samples, ctx.sample_rate)
    }
}

/// Low drone with slow amplitude movement.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Drone;

impl Voice for Drone {
    fn name(&self) -> &'static str {
        "ambient"
    }

    fn render(&self, ctx: &VoiceContext, _rng: &mut Pcg32) -> AudioBuffer {
        let n = ctx.num_samples();
        let tone = additive(&DRONE_PARTIALS, n, ctx.sample_rate);
        let motion = lfo(DRONE_LFO_RATE, 0.7, 0.3, n, ctx.sample_rate);

        let samples = tone
            .into_iter()
            .zip(motion)
            .map(|(s, m)| s * m * DRONE_GAIN)
            .collect();
        AudioBuffer::new(samples, ctx.sample_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::create_rng;

    #[test]
    fn test_waves_are_smooth_and_quiet() {
        let ctx = VoiceContext::new(2.0, 100.0, 0.5, 8000);
        let out = Waves.render(&ctx, &mut create_rng(4));
        assert_eq!(out.len(), 16000);
        // Averaging 800 samples of 0.15-sigma noise leaves very little.
        assert!(out.peak() < 0.05, "peak {}", out.peak());
        let max_step = out
            .samples
            .windows(2)
            .map(|w| (w[1] - w[0]).abs())
            .fold(0.0, f64::max);
        assert!(max_step < 0.01);
    }

    #[test]
    fn test_drone_bounded() {
        let ctx = VoiceContext::new(5.0, 100.0, 0.5, 4000);
        let out = Drone.render(&ctx, &mut create_rng(0));
        // 0.65 partial sum, 1.0 LFO ceiling, 0.15 gain.
        assert!(out.peak() <= 0.65 * 0.15 + 1e-9);
        assert!(out.peak() > 0.01);
    }
}
