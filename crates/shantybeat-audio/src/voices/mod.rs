//! Instrument voices.
//!
//! Each voice renders a mono buffer for a whole beat from the tempo grid,
//! the energy level and a seeded RNG. Scheduled events whose window would
//! reach the end of the buffer are dropped.

mod accents;
mod ambience;
mod lead;
mod pad;
mod percussion;

pub use accents::{Bells, HandClaps};
pub use ambience::{Drone, Waves};
pub use lead::{Fiddle, Flute};
pub use pad::Accordion;
pub use percussion::{DrumKit, DrumLayers};

use rand_pcg::Pcg32;
use shantybeat_spec::{InstrumentKind, InstrumentSpec};

use crate::buffer::{samples_for, AudioBuffer};

/// Shared timing and energy parameters for one render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceContext {
    /// Length in seconds.
    pub duration: f64,
    /// Tempo in beats per minute.
    pub bpm: f64,
    /// Energy in `[0.0, 1.0]`.
    pub energy: f64,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl VoiceContext {
    /// Creates a context.
    pub fn new(duration: f64, bpm: f64, energy: f64, sample_rate: u32) -> Self {
        Self {
            duration,
            bpm,
            energy,
            sample_rate,
        }
    }

    /// Buffer length in samples.
    pub fn num_samples(&self) -> usize {
        samples_for(self.duration, self.sample_rate)
    }

    /// Seconds per beat.
    pub fn beat_interval(&self) -> f64 {
        60.0 / self.bpm
    }

    /// Whole beats that start inside the buffer.
    pub fn num_beats(&self) -> usize {
        (self.duration / self.beat_interval()) as usize
    }

    /// Whole four-beat bars that fit inside the buffer.
    pub fn num_bars(&self) -> usize {
        (self.duration / (self.beat_interval() * 4.0)) as usize
    }

    /// Sample offset of beat `index`.
    pub fn beat_start(&self, index: usize) -> usize {
        (index as f64 * self.beat_interval() * self.sample_rate as f64) as usize
    }

    /// Sample count for an event lasting `seconds`.
    pub fn event_len(&self, seconds: f64) -> usize {
        samples_for(seconds, self.sample_rate)
    }

    /// Empty output buffer for this render.
    pub fn buffer(&self) -> AudioBuffer {
        AudioBuffer::zeros(self.num_samples(), self.sample_rate)
    }
}

/// A renderable instrument voice.
pub trait Voice {
    /// Short stable name, also used to derive the voice's RNG stream.
    fn name(&self) -> &'static str;

    /// Renders the voice for the whole context.
    fn render(&self, ctx: &VoiceContext, rng: &mut Pcg32) -> AudioBuffer;
}

/// A voice plus the weight it is summed with.
pub struct VoiceLayer {
    /// Voice to render.
    pub voice: Box<dyn Voice>,
    /// Linear mix weight.
    pub weight: f64,
}

impl std::fmt::Debug for VoiceLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceLayer")
            .field("voice", &self.voice.name())
            .field("weight", &self.weight)
            .finish()
    }
}

/// Builds the voice for a single instrument kind.
pub fn voice_for(kind: InstrumentKind) -> Box<dyn Voice> {
    match kind {
        InstrumentKind::Drums => Box::new(DrumKit::full()),
        InstrumentKind::LightDrums => Box::new(DrumKit::light()),
        InstrumentKind::Accordion => Box::new(Accordion),
        InstrumentKind::Fiddle => Box::new(Fiddle),
        InstrumentKind::Flute => Box::new(Flute),
        InstrumentKind::Bells | InstrumentKind::Chimes => Box::new(Bells),
        InstrumentKind::HandClaps => Box::new(HandClaps),
        InstrumentKind::Waves => Box::new(Waves),
        InstrumentKind::Ambient => Box::new(Drone),
    }
}

/// Resolves an instrument list into the layers to render.
///
/// Kinds that share a layer collapse into one: `Bells` and `Chimes` render a
/// single bell layer, and `Drums` supersedes `LightDrums`. The first listed
/// member of a group supplies the weight and the position.
pub fn layers_for(instruments: &[InstrumentSpec]) -> Vec<VoiceLayer> {
    let has_full_drums = instruments.iter().any(|s| s.kind == InstrumentKind::Drums);

    let mut seen: Vec<&'static str> = Vec::new();
    let mut layers = Vec::new();
    for spec in instruments {
        let kind = match spec.kind {
            InstrumentKind::LightDrums if has_full_drums => InstrumentKind::Drums,
            other => other,
        };
        let voice = voice_for(kind);
        if seen.contains(&voice.name()) {
            continue;
        }
        seen.push(voice.name());
        layers.push(VoiceLayer {
            voice,
            weight: spec.weight,
        });
    }
    layers
}

#[cfg(test)]
mod tests {
    use super::*;
    use shantybeat_spec::{Theme, ThemeProfile};

    fn names(layers: &[VoiceLayer]) -> Vec<&'static str> {
        layers.iter().map(|l| l.voice.name()).collect()
    }

    #[test]
    fn test_context_grid() {
        let ctx = VoiceContext::new(12.0, 120.0, 0.5, 1000);
        assert_eq!(ctx.num_samples(), 12_000);
        assert_eq!(ctx.beat_interval(), 0.5);
        assert_eq!(ctx.num_beats(), 24);
        assert_eq!(ctx.num_bars(), 6);
        assert_eq!(ctx.beat_start(3), 1500);
    }

    #[test]
    fn test_bells_and_chimes_share_a_layer() {
        let profile = ThemeProfile::for_theme(Theme::Treasure);
        let layers = layers_for(&profile.instruments);
        assert_eq!(names(&layers), vec!["bells", "drums"]);
        assert!((layers[0].weight - 0.35).abs() < 1e-12);
    }

    #[test]
    fn test_full_drums_supersede_light() {
        let specs = vec![
            InstrumentSpec::new(InstrumentKind::LightDrums),
            InstrumentSpec::new(InstrumentKind::Drums),
        ];
        let layers = layers_for(&specs);
        assert_eq!(names(&layers), vec!["drums"]);
    }

    #[test]
    fn test_light_drums_alone() {
        let profile = ThemeProfile::for_theme(Theme::Nature);
        let layers = layers_for(&profile.instruments);
        assert_eq!(names(&layers), vec!["waves", "flute", "light_drums"]);
    }
}
