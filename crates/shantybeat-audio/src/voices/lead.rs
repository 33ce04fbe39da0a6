//! Melodic leads: a plucked fiddle line and a breathy high flute.

use rand_pcg::Pcg32;

use super::{Voice, VoiceContext};
use crate::buffer::AudioBuffer;
use crate::envelope::{AttackRelease, ExpDecay};
use crate::oscillator::{additive, Partial};

/// A minor pentatonic: A3 C4 D4 E4 G4.
const FIDDLE_NOTES: [f64; 5] = [220.0, 262.0, 294.0, 330.0, 392.0];
const FIDDLE_HARMONICS: usize = 5;
const FIDDLE_DECAY: f64 = 4.0;
const FIDDLE_GAIN: f64 = 0.15;

/// C5 D5 E5 F5 G5.
const FLUTE_NOTES: [f64; 5] = [523.0, 587.0, 659.0, 698.0, 784.0];
const FLUTE_PARTIALS: [(f64, f64); 3] = [(1.0, 1.0), (2.0, 0.3), (3.0, 0.1)];
const FLUTE_GAIN: f64 = 0.12;

/// Sawtooth-like lead, busier at high energy.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Fiddle;

impl Fiddle {
    fn note(freq: f64, num_samples: usize, sample_rate: u32) -> Vec<f64> {
        let partials: Vec<Partial> = (1..=FIDDLE_HARMONICS)
            .map(|h| Partial::new(freq * h as f64, 1.0 / h as f64))
            .collect();
        let envelope = ExpDecay::new(FIDDLE_DECAY).render(num_samples, sample_rate);
        additive(&partials, num_samples, sample_rate)
            .into_iter()
            .zip(envelope)
            .map(|(s, e)| s * e)
            .collect()
    }
}

impl Voice for Fiddle {
    fn name(&self) -> &'static str {
        "fiddle"
    }

    fn render(&self, ctx: &VoiceContext, _rng: &mut Pcg32) -> AudioBuffer {
        let mut out = ctx.buffer();
        let note_len = ctx.event_len(ctx.beat_interval() * 0.6);

        for beat in 0..ctx.num_beats() {
            if ctx.energy > 0.6 || beat % 2 == 0 {
                let freq = FIDDLE_NOTES[beat % FIDDLE_NOTES.len()];
                let note = Self::note(freq, note_len, ctx.sample_rate);
                out.add_event(ctx.beat_start(beat), &note, FIDDLE_GAIN);
            }
        }
        out
    }
}

/// Soft high lead on every beat of each whole bar.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Flute;

impl Flute {
    fn note(freq: f64, num_samples: usize, sample_rate: u32) -> Vec<f64> {
        let partials: Vec<Partial> = FLUTE_PARTIALS
            .iter()
            .map(|&(ratio, amp)| Partial::new(freq * ratio, amp))
            .collect();
        let envelope = AttackRelease::breath().render(num_samples, sample_rate);
        additive(&partials, num_samples, sample_rate)
            .into_iter()
            .zip(envelope)
            .map(|(s, e)| s * e)
            .collect()
    }
}

impl Voice for Flute {
    fn name(&self) -> &'static str {
        "flute"
    }

    fn render(&self, ctx: &VoiceContext, _rng: &mut Pcg32) -> AudioBuffer {
        let mut out = ctx.buffer();
        let note_len = ctx.event_len(ctx.beat_interval() * 0.8);

        for beat in 0..ctx.num_bars() * 4 {
            let freq = FLUTE_NOTES[beat % FLUTE_NOTES.len()];
            let note = Self::note(freq, note_len, ctx.sample_rate);
            out.add_event(ctx.beat_start(beat), &note, FLUTE_GAIN);
        }
        out
    }
}
