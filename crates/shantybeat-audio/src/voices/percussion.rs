//! Kick, snare and hi-hat on a four-beat shanty pattern.

use rand_pcg::Pcg32;

use super::{Voice, VoiceContext};
use crate::buffer::AudioBuffer;
use crate::envelope::ExpDecay;
use crate::oscillator::{gaussian_noise, sine};

const KICK_LENGTH: f64 = 0.15;
const KICK_FREQ: f64 = 55.0;
const KICK_DECAY: f64 = 25.0;

const SNARE_LENGTH: f64 = 0.08;
const SNARE_FREQ: f64 = 200.0;
const SNARE_NOISE: f64 = 0.8;
const SNARE_DECAY: f64 = 60.0;
const SNARE_GAIN: f64 = 0.8;

const HAT_LENGTH: f64 = 0.04;
const HAT_NOISE: f64 = 0.4;
const HAT_DECAY: f64 = 150.0;

const KICK_WEIGHT: f64 = 0.45;
const SNARE_WEIGHT: f64 = 0.35;
const HAT_WEIGHT: f64 = 0.25;

/// Separate kit layers before they are summed.
#[derive(Debug, Clone, PartialEq)]
pub struct DrumLayers {
    /// Kick on beats 1 and 3.
    pub kick: AudioBuffer,
    /// Snare on beats 2 and 4.
    pub snare: AudioBuffer,
    /// Hi-hat on every beat, or every other beat at low energy.
    pub hihat: AudioBuffer,
}

/// Drum kit voice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrumKit {
    /// Gain applied to every hit.
    pub intensity: f64,
}

impl DrumKit {
    /// Full kit at intensity 1.0.
    pub fn full() -> Self {
        Self { intensity: 1.0 }
    }

    /// Lighter kit at intensity 0.7.
    pub fn light() -> Self {
        Self { intensity: 0.7 }
    }

    /// Renders the three layers separately.
    pub fn render_layers(&self, ctx: &VoiceContext, rng: &mut Pcg32) -> DrumLayers {
        let sr = ctx.sample_rate;
        let mut kick = ctx.buffer();
        let mut snare = ctx.buffer();
        let mut hihat = ctx.buffer();

        let kick_len = ctx.event_len(KICK_LENGTH);
        let snare_len = ctx.event_len(SNARE_LENGTH);
        let hat_len = ctx.event_len(HAT_LENGTH);

        let kick_hit: Vec<f64> = sine(KICK_FREQ, kick_len, sr)
            .into_iter()
            .zip(ExpDecay::new(KICK_DECAY).render(kick_len, sr))
            .map(|(s, e)| s * e)
            .collect();
        let snare_tone = sine(SNARE_FREQ, snare_len, sr);
        let snare_env = ExpDecay::new(SNARE_DECAY).render(snare_len, sr);
        let hat_env = ExpDecay::new(HAT_DECAY).render(hat_len, sr);
        let hat_gain = self.intensity * (0.5 + 0.5 * ctx.energy);

        for beat in 0..ctx.num_beats() {
            let start = ctx.beat_start(beat);
            let position = beat % 4;

            if position == 0 || position == 2 {
                kick.add_event(start, &kick_hit, self.intensity);
            }

            if (position == 1 || position == 3) && start + snare_len < ctx.num_samples() {
                let noise = gaussian_noise(snare_len, SNARE_NOISE, rng);
                let hit: Vec<f64> = snare_tone
                    .iter()
                    .zip(&noise)
                    .zip(&snare_env)
                    .map(|((tone, n), e)| (tone + n) * e)
                    .collect();
                snare.add_event(start, &hit, self.intensity * SNARE_GAIN);
            }

            if (ctx.energy > 0.5 || beat % 2 == 0) && start + hat_len < ctx.num_samples() {
                let hit: Vec<f64> = gaussian_noise(hat_len, HAT_NOISE, rng)
                    .into_iter()
                    .zip(&hat_env)
                    .map(|(n, e)| n * e)
                    .collect();
                hihat.add_event(start, &hit, hat_gain);
            }
        }

        DrumLayers { kick, snare, hihat }
    }
}

impl Voice for DrumKit {
    fn name(&self) -> &'static str {
        if self.intensity < 1.0 {
            "light_drums"
        } else {
            "drums"
        }
    }

    fn render(&self, ctx: &VoiceContext, rng: &mut Pcg32) -> AudioBuffer {
        let layers = self.render_layers(ctx, rng);
        let mut out = ctx.buffer();
        out.mix_in(&layers.kick.samples, KICK_WEIGHT);
        out.mix_in(&layers.snare.samples, SNARE_WEIGHT);
        out.mix_in(&layers.hihat.samples, HAT_WEIGHT);
        out
    }
}
