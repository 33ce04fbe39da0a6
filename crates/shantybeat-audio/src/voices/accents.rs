//! Bell strikes and hand-claps.

use rand_pcg::Pcg32;

use super::{Voice, VoiceContext};
use crate::buffer::AudioBuffer;
use crate::envelope::ExpDecay;
use crate::oscillator::{additive, gaussian_noise, Partial};

/// C major triad, each partial with its own decay.
const BELL_PARTIALS: [Partial; 3] = [
    Partial::decaying(523.0, 1.0, 8.0),
    Partial::decaying(659.0, 0.7, 10.0),
    Partial::decaying(784.0, 0.5, 12.0),
];
const BELL_LENGTH: f64 = 0.8;
const BELL_GAIN: f64 = 0.25;

const CLAP_LENGTH: f64 = 0.05;
const CLAP_NOISE: f64 = 0.6;
const CLAP_DECAY: f64 = 80.0;

/// Bell strike on beats 1 and 3. Also renders chimes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bells;

impl Voice for Bells {
    fn name(&self) -> &'static str {
        "bells"
    }

    fn render(&self, ctx: &VoiceContext, _rng: &mut Pcg32) -> AudioBuffer {
        let mut out = ctx.buffer();
        let strike = additive(
            &BELL_PARTIALS,
            ctx.event_len(BELL_LENGTH),
            ctx.sample_rate,
        );
        for beat in (0..ctx.num_beats()).filter(|b| b % 4 == 0 || b % 4 == 2) {
            out.add_event(ctx.beat_start(beat), &strike, BELL_GAIN);
        }
        out
    }
}

/// Noise-burst claps on beats 2 and 4.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HandClaps;

impl Voice for HandClaps {
    fn name(&self) -> &'static str {
        "hand_claps"
    }

    fn render(&self, ctx: &VoiceContext, rng: &mut Pcg32) -> AudioBuffer {
        let mut out = ctx.buffer();
        let len = ctx.event_len(CLAP_LENGTH);
        let envelope = ExpDecay::new(CLAP_DECAY).render(len, ctx.sample_rate);

        for beat in (0..ctx.num_beats()).filter(|b| b % 4 == 1 || b % 4 == 3) {
            let start = ctx.beat_start(beat);
            if start + len >= out.len() {
                continue;
            }
            let clap: Vec<f64> = gaussian_noise(len, CLAP_NOISE, rng)
                .into_iter()
                .zip(&envelope)
                .map(|(n, e)| n * e)
                .collect();
            out.add_event(start, &clap, 1.0);
        }
        out
    }
}
