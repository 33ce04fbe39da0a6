//! Accordion chord pad: one chord per bar with a light vibrato.

use std::f64::consts::PI;

use rand_pcg::Pcg32;

use super::{Voice, VoiceContext};
use crate::buffer::AudioBuffer;
use crate::envelope::AttackRelease;

/// Am, F, C, G.
const CHORD_ROOTS: [f64; 4] = [220.0, 175.0, 262.0, 196.0];

/// Root, fifth and octave as (ratio, amplitude).
const CHORD_TONES: [(f64, f64); 3] = [(1.0, 1.0), (1.5, 0.6), (2.0, 0.4)];

const VIBRATO_DEPTH: f64 = 0.015;
const VIBRATO_RATE: f64 = 5.5;
const GAIN: f64 = 0.3;

/// Chord pad voice.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Accordion;

impl Accordion {
    fn chord(root: f64, num_samples: usize, sample_rate: u32) -> Vec<f64> {
        let sr = sample_rate as f64;
        let envelope = AttackRelease::pad().render(num_samples, sample_rate);
        (0..num_samples)
            .map(|i| {
                let t = i as f64 / sr;
                let vibrato = 1.0 + VIBRATO_DEPTH * (2.0 * PI * VIBRATO_RATE * t).sin();
                let tone: f64 = CHORD_TONES
                    .iter()
                    .map(|(ratio, amp)| amp * (2.0 * PI * root * ratio * t * vibrato).sin())
                    .sum();
                tone * envelope[i]
            })
            .collect()
    }
}

impl Voice for Accordion {
    fn name(&self) -> &'static str {
        "accordion"
    }

    fn render(&self, ctx: &VoiceContext, _rng: &mut Pcg32) -> AudioBuffer {
        let mut out = ctx.buffer();
        let bar_len = ctx.event_len(ctx.beat_interval() * 4.0);

        for bar in 0..ctx.num_bars() {
            let root = CHORD_ROOTS[bar % CHORD_ROOTS.len()];
            let chord = Self::chord(root, bar_len, ctx.sample_rate);
            out.add_event(ctx.beat_start(bar * 4), &chord, GAIN);
        }
        out
    }
}
