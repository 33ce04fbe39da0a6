//! Themed beat synthesis.
//!
//! A [`SynthesisRequest`] names a theme profile, a length, a tempo and a seed.
//! The [`BeatSynthesizer`] renders each of the profile's voice layers with its
//! own seeded RNG, sums them by weight, normalizes to a fixed headroom and
//! scales by energy.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shantybeat_spec::ThemeProfile;
use tracing::{debug, info};

use crate::buffer::AudioBuffer;
use crate::error::{AudioError, AudioResult};
use crate::io::{export, ExportFormat};
use crate::rng::create_component_rng;
use crate::voices::{layers_for, VoiceContext};

/// Peak level after normalization, before the energy scale.
pub const HEADROOM: f64 = 0.85;

/// Default output sample rate.
pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;

/// Inputs for one synthesized beat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisRequest {
    /// Theme, mood, energy and voices.
    pub profile: ThemeProfile,
    /// Length in seconds.
    pub duration: f64,
    /// Tempo in beats per minute.
    pub bpm: f64,
    /// Base seed for every voice's noise.
    #[serde(default)]
    pub seed: u32,
}

impl SynthesisRequest {
    /// Creates a request with seed 0.
    pub fn new(profile: ThemeProfile, duration: f64, bpm: f64) -> Self {
        Self {
            profile,
            duration,
            bpm,
            seed: 0,
        }
    }

    /// Sets the base seed.
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Checks duration, tempo, energy and the voice list.
    pub fn validate(&self) -> AudioResult<()> {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(AudioError::InvalidDuration {
                duration: self.duration,
            });
        }
        if !self.bpm.is_finite() || self.bpm <= 0.0 {
            return Err(AudioError::InvalidTempo { bpm: self.bpm });
        }
        let energy = self.profile.energy;
        if !energy.is_finite() || !(0.0..=1.0).contains(&energy) {
            return Err(AudioError::invalid_param(
                "energy",
                format!("must be in [0, 1], got {}", energy),
            ));
        }
        if self.profile.instruments.is_empty() {
            return Err(AudioError::synthesis(format!(
                "theme '{}' has no instruments",
                self.profile.theme
            )));
        }
        for spec in &self.profile.instruments {
            if !spec.weight.is_finite() {
                return Err(AudioError::invalid_param(
                    spec.kind.as_str(),
                    "weight must be finite",
                ));
            }
        }
        Ok(())
    }

    /// File name used when no output path is given.
    ///
    /// The suffix is derived from the request, so identical requests reuse
    /// the same name.
    pub fn default_file_name(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.profile.theme.as_str().as_bytes());
        hasher.update(&self.duration.to_le_bytes());
        hasher.update(&self.bpm.to_le_bytes());
        hasher.update(&self.profile.energy.to_le_bytes());
        hasher.update(&self.seed.to_le_bytes());
        let digest = hasher.finalize().to_hex();
        format!("beat_{}_{}.wav", self.profile.theme, &digest[..8])
    }
}

/// Renders themed beats at a fixed sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct BeatSynthesizer {
    sample_rate: u32,
    temp_dir: PathBuf,
    format: ExportFormat,
}

impl BeatSynthesizer {
    /// Creates a synthesizer writing generated files under `temp_dir`.
    pub fn new(sample_rate: u32, temp_dir: impl Into<PathBuf>) -> AudioResult<Self> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate { rate: sample_rate });
        }
        Ok(Self {
            sample_rate,
            temp_dir: temp_dir.into(),
            format: ExportFormat::Wav16,
        })
    }

    /// Sets the file encoding.
    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    /// Output sample rate.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Renders the beat to a mono buffer.
    ///
    /// # Arguments
    /// * `request` - Theme profile, length, tempo and seed
    ///
    /// # Returns
    /// `floor(duration * sample_rate)` samples peaking at or below [`HEADROOM`]
    pub fn synthesize(&self, request: &SynthesisRequest) -> AudioResult<AudioBuffer> {
        request.validate()?;

        let profile = &request.profile;
        info!(
            theme = %profile.theme,
            mood = %profile.mood,
            energy = profile.energy,
            duration = request.duration,
            bpm = request.bpm,
            "synthesizing beat"
        );

        let ctx = VoiceContext::new(
            request.duration,
            request.bpm,
            profile.energy,
            self.sample_rate,
        );
        let mut mix = ctx.buffer();

        for layer in layers_for(&profile.instruments) {
            let name = layer.voice.name();
            let mut rng = create_component_rng(request.seed, name);
            let rendered = layer.voice.render(&ctx, &mut rng);
            rendered.ensure_finite(name)?;
            debug!(voice = name, weight = layer.weight, peak = rendered.peak(), "rendered voice");
            mix.mix_in(&rendered.samples, layer.weight);
        }

        mix.ensure_finite("mix")?;
        mix.normalize_peak(HEADROOM);
        mix.scale(0.7 + 0.3 * profile.energy);
        Ok(mix)
    }

    /// Renders the beat and writes it as a stereo file.
    ///
    /// Without an explicit `output` the file goes to the temp directory under
    /// [`SynthesisRequest::default_file_name`].
    pub fn synthesize_to_file(
        &self,
        request: &SynthesisRequest,
        output: Option<&Path>,
    ) -> AudioResult<PathBuf> {
        let buffer = self.synthesize(request)?;
        let path = match output {
            Some(path) => path.to_path_buf(),
            None => self.temp_dir.join(request.default_file_name()),
        };
        export(&buffer, &path, self.format)?;
        info!(path = %path.display(), seconds = buffer.duration_seconds(), "beat written");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shantybeat_spec::{InstrumentKind, InstrumentSpec, Theme};

    fn request(theme: Theme, duration: f64, bpm: f64) -> SynthesisRequest {
        SynthesisRequest::new(ThemeProfile::for_theme(theme), duration, bpm)
    }

    #[test]
    fn test_every_theme_renders_within_headroom() {
        let synth = BeatSynthesizer::new(8000, std::env::temp_dir()).unwrap();
        for theme in Theme::all() {
            let req = request(*theme, 3.0, 100.0);
            let out = synth.synthesize(&req).unwrap();
            assert_eq!(out.len(), 24_000, "theme {}", theme);
            assert!(out.peak() <= HEADROOM + 1e-9, "theme {} peak {}", theme, out.peak());
            assert!(out.peak() > 0.0, "theme {} is silent", theme);
        }
    }

    #[test]
    fn test_energy_scales_final_level() {
        let synth = BeatSynthesizer::new(8000, std::env::temp_dir()).unwrap();
        let req = request(Theme::Adventure, 2.0, 100.0);
        let out = synth.synthesize(&req).unwrap();
        let expected = HEADROOM * (0.7 + 0.3 * 0.9);
        assert!((out.peak() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_same_seed_same_output() {
        let synth = BeatSynthesizer::new(8000, std::env::temp_dir()).unwrap();
        let req = request(Theme::Crew, 2.0, 104.0).with_seed(11);
        assert_eq!(synth.synthesize(&req).unwrap(), synth.synthesize(&req).unwrap());
        let other = req.clone().with_seed(12);
        assert_ne!(synth.synthesize(&req).unwrap(), synth.synthesize(&other).unwrap());
    }

    #[test]
    fn test_invalid_requests_rejected() {
        let synth = BeatSynthesizer::new(8000, std::env::temp_dir()).unwrap();
        assert!(matches!(
            synth.synthesize(&request(Theme::Nature, 0.0, 100.0)),
            Err(AudioError::InvalidDuration { .. })
        ));
        assert!(matches!(
            synth.synthesize(&request(Theme::Nature, 2.0, f64::NAN)),
            Err(AudioError::InvalidTempo { .. })
        ));

        let mut empty = request(Theme::Nature, 2.0, 100.0);
        empty.profile.instruments.clear();
        assert!(matches!(
            synth.synthesize(&empty),
            Err(AudioError::Synthesis { .. })
        ));

        let mut hot = request(Theme::Nature, 2.0, 100.0);
        hot.profile.energy = 1.5;
        assert!(synth.synthesize(&hot).is_err());

        assert!(BeatSynthesizer::new(0, std::env::temp_dir()).is_err());
    }

    #[test]
    fn test_non_finite_weight_rejected() {
        let synth = BeatSynthesizer::new(8000, std::env::temp_dir()).unwrap();
        let mut req = request(Theme::Nature, 2.0, 100.0);
        req.profile.instruments =
            vec![InstrumentSpec::new(InstrumentKind::Flute).with_weight(f64::INFINITY)];
        assert!(synth.synthesize(&req).is_err());
    }

    #[test]
    fn test_too_short_for_any_event_is_silent() {
        // 0.1 s holds no whole beat, and the continuous beds are absent.
        let synth = BeatSynthesizer::new(8000, std::env::temp_dir()).unwrap();
        let out = synth
            .synthesize(&request(Theme::Treasure, 0.1, 100.0))
            .unwrap();
        assert_eq!(out.len(), 800);
        assert!(out.is_silent());
    }

    #[test]
    fn test_default_file_name() {
        let req = request(Theme::Treasure, 12.0, 97.0);
        let name = req.default_file_name();
        assert!(name.starts_with("beat_treasure_"));
        assert!(name.ends_with(".wav"));
        assert_eq!(name.len(), "beat_treasure_".len() + 8 + 4);
        assert_eq!(name, req.default_file_name());
    }
}
