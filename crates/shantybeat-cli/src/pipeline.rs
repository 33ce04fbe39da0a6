//! Vocal to finished song.
//!
//! The vocal's tempo is estimated and clamped to the configured band. The
//! instrumental then comes from the first source that produces one:
//!
//! 1. a background track, when background music is enabled
//! 2. the closest catalog beat within tolerance, stretched to the target tempo
//! 3. a freshly synthesized beat for the word's theme
//!
//! The instrumental is looped or trimmed to the vocal, mixed under it and
//! written to the output directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use shantybeat_audio::{
    export, load_audio, stretch_to_tempo, AudioBuffer, BeatSynthesizer, FallbackReason,
    MixRequest, SynthesisRequest, TempoEstimate, TempoEstimator,
};
use shantybeat_catalog::{BackgroundLibrary, SharedCatalog};
use shantybeat_spec::{adjust_energy_for_bpm, MoodAnalyzer, Theme, ThemeProfile};
use tracing::{info, warn};

use crate::config::ShantyConfig;

/// Catalog beats closer than this to the target tempo are used unstretched.
pub const STRETCH_THRESHOLD_BPM: f64 = 0.5;

/// Where the instrumental under a song came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InstrumentalSource {
    /// A track from the background-music directory.
    Background {
        /// Track file.
        path: PathBuf,
    },
    /// A catalog beat.
    Catalog {
        /// Beat file.
        path: PathBuf,
        /// Genre it was listed under.
        genre: String,
        /// Tempo recorded in the catalog.
        catalog_bpm: f64,
        /// Whether it was time-stretched to the target tempo.
        stretched: bool,
    },
    /// A beat synthesized for this song.
    Synthesized {
        /// Theme the voices were chosen for.
        theme: Theme,
        /// Beat length in seconds.
        duration: f64,
        /// Beat tempo.
        bpm: f64,
    },
}

impl InstrumentalSource {
    /// Short tag for display.
    pub fn label(&self) -> &'static str {
        match self {
            InstrumentalSource::Background { .. } => "background",
            InstrumentalSource::Catalog { .. } => "catalog",
            InstrumentalSource::Synthesized { .. } => "synthesized",
        }
    }
}

/// Summary of one rendered song.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineReport {
    /// Written file.
    pub output_path: PathBuf,
    /// Song length in seconds, equal to the vocal length.
    pub duration_seconds: f64,
    /// Tempo estimated from the vocal, before clamping.
    pub detected_bpm: f64,
    /// Whether the estimate is the fallback tempo.
    pub bpm_was_fallback: bool,
    /// Why the estimate fell back, if it did.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<FallbackReason>,
    /// Tempo used for matching and synthesis.
    pub target_bpm: f64,
    /// Theme resolved from the word.
    pub theme: Theme,
    /// Energy after lyrics and tempo adjustments.
    pub energy: f64,
    /// Source of the instrumental.
    pub instrumental: InstrumentalSource,
    /// BLAKE3 digest of the written samples.
    pub pcm_hash: String,
}

/// One song to render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    /// Vocal recording.
    pub vocal: PathBuf,
    /// Subject word the theme is chosen from.
    pub word: String,
    /// Lyrics used to pick the mood, if available.
    pub lyrics: Option<String>,
    /// Output file; defaults to a name in the output directory.
    pub output: Option<PathBuf>,
}

impl RenderRequest {
    /// Request for `vocal` themed on `word`.
    pub fn new(vocal: impl Into<PathBuf>, word: impl Into<String>) -> Self {
        Self {
            vocal: vocal.into(),
            word: word.into(),
            lyrics: None,
            output: None,
        }
    }

    /// Sets the lyrics.
    pub fn with_lyrics(mut self, lyrics: impl Into<String>) -> Self {
        self.lyrics = Some(lyrics.into());
        self
    }

    /// Sets the output file.
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }
}

/// A mixed song still in memory.
#[derive(Debug, Clone)]
pub struct MixedSong {
    /// Final samples at the vocal's sample rate.
    pub audio: AudioBuffer,
    /// Tempo estimate of the vocal.
    pub estimate: TempoEstimate,
    /// Clamped tempo.
    pub target_bpm: f64,
    /// Theme profile used for synthesis.
    pub profile: ThemeProfile,
    /// Where the instrumental came from.
    pub instrumental: InstrumentalSource,
}

/// Renders songs with a fixed configuration and catalog.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: ShantyConfig,
    catalog: SharedCatalog,
    synthesizer: BeatSynthesizer,
    background: BackgroundLibrary,
    estimator: TempoEstimator,
    moods: MoodAnalyzer,
}

impl Pipeline {
    /// Builds a pipeline over an already loaded catalog.
    pub fn new(config: ShantyConfig, catalog: SharedCatalog) -> Result<Self> {
        config.validate()?;
        let synthesizer = BeatSynthesizer::new(config.sample_rate, &config.temp_dir)?
            .with_format(config.export_format);
        let background = BackgroundLibrary::new(&config.background_music_dir);
        Ok(Self {
            config,
            catalog,
            synthesizer,
            background,
            estimator: TempoEstimator::default(),
            moods: MoodAnalyzer::new(),
        })
    }

    /// Builds a pipeline, loading the catalog named by the configuration.
    pub fn from_config(config: ShantyConfig) -> Result<Self> {
        let path = config.catalog_path();
        let catalog = SharedCatalog::load(&path)
            .with_context(|| format!("Failed to load catalog: {}", path.display()))?;
        Self::new(config, catalog)
    }

    /// Active configuration.
    pub fn config(&self) -> &ShantyConfig {
        &self.config
    }

    /// Shared catalog handle.
    pub fn catalog(&self) -> &SharedCatalog {
        &self.catalog
    }

    /// Theme profile for `word`, with mood from `lyrics` and energy nudged by tempo.
    pub fn profile(&self, word: &str, lyrics: Option<&str>, bpm: f64) -> Result<ThemeProfile> {
        let mut profile = ThemeProfile::for_word(word);
        if let Some(lyrics) = lyrics {
            let analysis = self.moods.analyze(lyrics);
            info!(
                mood = %analysis.mood,
                confidence = analysis.confidence,
                "lyrics mood"
            );
            profile = profile.with_mood(analysis.mood).with_energy(analysis.energy)?;
        }
        let energy = adjust_energy_for_bpm(profile.energy, bpm);
        Ok(profile.with_energy(energy)?)
    }

    /// Picks and prepares the instrumental for a vocal of `vocal_seconds`.
    pub fn instrumental(
        &self,
        target_bpm: f64,
        vocal_seconds: f64,
        profile: &ThemeProfile,
    ) -> Result<(AudioBuffer, InstrumentalSource)> {
        if self.config.use_background_music {
            if let Some(found) = self.background_track()? {
                return Ok(found);
            }
        }
        if let Some(found) = self.catalog_beat(target_bpm)? {
            return Ok(found);
        }
        self.synthesized_beat(target_bpm, vocal_seconds, profile)
    }

    /// Mixes `vocal` with an instrumental chosen for it.
    pub fn mix_vocal(&self, vocal: AudioBuffer, word: &str, lyrics: Option<&str>) -> Result<MixedSong> {
        let estimate = self.estimator.estimate(&vocal);
        let band = self.config.tempo_band();
        let target_bpm = band.clamp(estimate.bpm());
        if target_bpm != estimate.bpm() {
            warn!(
                detected = estimate.bpm(),
                target = target_bpm,
                "vocal tempo outside band, clamped"
            );
        }

        let profile = self.profile(word, lyrics, target_bpm)?;
        let (instrumental_audio, instrumental) =
            self.instrumental(target_bpm, vocal.duration_seconds(), &profile)?;

        let fade = match instrumental {
            InstrumentalSource::Background { .. } => self.config.fade_out_seconds,
            _ => 0.0,
        };
        let audio = MixRequest::new(vocal, instrumental_audio)
            .vocal_gain(self.config.vocals_volume)
            .instrumental_gain(self.config.instrumental_volume)
            .fade_out(fade)
            .mix()
            .context("Failed to mix vocal and instrumental")?;

        Ok(MixedSong {
            audio,
            estimate,
            target_bpm,
            profile,
            instrumental,
        })
    }

    /// Loads the vocal, mixes it and writes the song.
    pub fn render(&self, request: &RenderRequest) -> Result<PipelineReport> {
        let vocal = load_audio(&request.vocal)
            .with_context(|| format!("Failed to load vocal: {}", request.vocal.display()))?;
        info!(
            vocal = %request.vocal.display(),
            seconds = vocal.duration_seconds(),
            word = %request.word,
            "rendering song"
        );

        let song = self.mix_vocal(vocal, &request.word, request.lyrics.as_deref())?;
        let output = match &request.output {
            Some(path) => path.clone(),
            None => self.config.output_dir.join(song_file_name(request, self.config.seed)),
        };
        let summary = export(&song.audio, &output, self.config.export_format)
            .with_context(|| format!("Failed to write song: {}", output.display()))?;
        info!(
            path = %output.display(),
            instrumental = song.instrumental.label(),
            "song written"
        );

        Ok(PipelineReport {
            output_path: output,
            duration_seconds: song.audio.duration_seconds(),
            detected_bpm: song.estimate.bpm(),
            bpm_was_fallback: song.estimate.is_fallback(),
            fallback_reason: song.estimate.reason(),
            target_bpm: song.target_bpm,
            theme: song.profile.theme,
            energy: song.profile.energy,
            instrumental: song.instrumental,
            pcm_hash: summary.pcm_hash,
        })
    }

    fn background_track(&self) -> Result<Option<(AudioBuffer, InstrumentalSource)>> {
        let Some(path) = self.background.select(self.config.seed)? else {
            warn!("background music enabled but no tracks found");
            return Ok(None);
        };
        match load_audio(&path) {
            Ok(audio) if !audio.is_empty() => {
                info!(track = %path.display(), "using background track");
                Ok(Some((audio, InstrumentalSource::Background { path })))
            }
            Ok(_) => {
                warn!(track = %path.display(), "background track is empty");
                Ok(None)
            }
            Err(e) => {
                warn!(track = %path.display(), error = %e, "cannot load background track");
                Ok(None)
            }
        }
    }

    fn catalog_beat(&self, target_bpm: f64) -> Result<Option<(AudioBuffer, InstrumentalSource)>> {
        let genre = &self.config.default_genre;
        let Some(entry) = self
            .catalog
            .find_closest(target_bpm, genre, self.config.tolerance)
        else {
            return Ok(None);
        };

        let audio = match load_audio(&entry.path) {
            Ok(audio) if !audio.is_empty() => audio,
            Ok(_) => {
                warn!(beat = %entry.path.display(), "catalog beat is empty");
                return Ok(None);
            }
            Err(e) => {
                warn!(beat = %entry.path.display(), error = %e, "cannot load catalog beat");
                return Ok(None);
            }
        };

        let stretched = (entry.bpm - target_bpm).abs() > STRETCH_THRESHOLD_BPM;
        let audio = if stretched {
            stretch_to_tempo(&audio, entry.bpm, target_bpm, self.config.stretch_method)
                .with_context(|| format!("Failed to stretch beat: {}", entry.path.display()))?
        } else {
            audio
        };

        Ok(Some((
            audio,
            InstrumentalSource::Catalog {
                genre: genre.clone(),
                catalog_bpm: entry.bpm,
                path: entry.path,
                stretched,
            },
        )))
    }

    fn synthesized_beat(
        &self,
        target_bpm: f64,
        vocal_seconds: f64,
        profile: &ThemeProfile,
    ) -> Result<(AudioBuffer, InstrumentalSource)> {
        let duration = vocal_seconds + self.config.tail_padding_seconds;
        info!(theme = %profile.theme, duration, bpm = target_bpm, "no catalog match, synthesizing");
        let request = SynthesisRequest::new(profile.clone(), duration, target_bpm)
            .with_seed(self.config.seed);
        let audio = self
            .synthesizer
            .synthesize(&request)
            .context("Failed to synthesize beat")?;
        Ok((
            audio,
            InstrumentalSource::Synthesized {
                theme: profile.theme,
                duration,
                bpm: target_bpm,
            },
        ))
    }
}

/// `song_<word>_<hash>.<ext>`, stable for the same vocal path, word and seed.
fn song_file_name(request: &RenderRequest, seed: u32) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(request.vocal.to_string_lossy().as_bytes());
    hasher.update(request.word.as_bytes());
    hasher.update(&seed.to_le_bytes());
    let digest = hasher.finalize().to_hex();
    format!("song_{}_{}.wav", slug(&request.word), &digest[..8])
}

fn slug(word: &str) -> String {
    let slug: String = word
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug
    }
}

/// Reads a lyrics file, if one was given.
pub fn read_lyrics(path: Option<&Path>) -> Result<Option<String>> {
    path.map(|p| {
        std::fs::read_to_string(p)
            .with_context(|| format!("Failed to read lyrics file: {}", p.display()))
    })
    .transpose()
}
