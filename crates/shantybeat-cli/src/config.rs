//! Runtime configuration.
//!
//! Every field has a default, so an empty JSON object (or no file at all) is a
//! valid configuration. Values from `--config` are applied first, then
//! command-line overrides.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};
use shantybeat_audio::{ExportFormat, StretchMethod};
use shantybeat_catalog::CATALOG_FILE_NAME;
use shantybeat_spec::TempoBand;

/// Pipeline settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShantyConfig {
    /// Sample rate for synthesized beats.
    pub sample_rate: u32,
    /// Linear vocal gain in the final mix.
    pub vocals_volume: f64,
    /// Linear instrumental gain in the final mix.
    pub instrumental_volume: f64,
    /// Lowest tempo used for matching and synthesis.
    pub bpm_min: f64,
    /// Highest tempo used for matching and synthesis.
    pub bpm_max: f64,
    /// Largest accepted distance in BPM for a catalog match.
    pub tolerance: f64,
    /// Genre searched first when matching.
    pub default_genre: String,
    /// Root of `<genre>/*.wav` beat folders; holds `catalog.json`.
    pub beats_dir: PathBuf,
    /// Where rendered songs are written.
    pub output_dir: PathBuf,
    /// Where generated and stretched beats are written.
    pub temp_dir: PathBuf,
    /// Directory of background tracks.
    pub background_music_dir: PathBuf,
    /// Use a background track instead of catalog or synthesized beats.
    pub use_background_music: bool,
    /// Fade applied to the end of a background track.
    pub fade_out_seconds: f64,
    /// Extra synthesized beat length past the end of the vocal.
    pub tail_padding_seconds: f64,
    /// Encoding of written files.
    pub export_format: ExportFormat,
    /// How catalog beats are brought to the vocal tempo.
    pub stretch_method: StretchMethod,
    /// Seed for synthesis noise and background selection.
    pub seed: u32,
}

impl Default for ShantyConfig {
    fn default() -> Self {
        Self {
            sample_rate: 24_000,
            vocals_volume: 1.0,
            instrumental_volume: 0.4,
            bpm_min: 90.0,
            bpm_max: 110.0,
            tolerance: 15.0,
            default_genre: "pirate-shanty".to_string(),
            beats_dir: PathBuf::from("beats"),
            output_dir: PathBuf::from("outputs"),
            temp_dir: PathBuf::from("temp"),
            background_music_dir: PathBuf::from("background_music"),
            use_background_music: false,
            fade_out_seconds: 1.0,
            tail_padding_seconds: 2.0,
            export_format: ExportFormat::Wav16,
            stretch_method: StretchMethod::PhaseVocoder,
            seed: 0,
        }
    }
}

impl ShantyConfig {
    /// Parses a configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Loads `path` if given, applies `overrides` and validates the result.
    pub fn resolve(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply(overrides);
        config.validate()?;
        Ok(config)
    }

    /// Replaces every field the overrides set.
    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(dir) = &overrides.beats_dir {
            self.beats_dir = dir.clone();
        }
        if let Some(dir) = &overrides.output_dir {
            self.output_dir = dir.clone();
        }
        if let Some(dir) = &overrides.temp_dir {
            self.temp_dir = dir.clone();
        }
        if let Some(dir) = &overrides.background_music_dir {
            self.background_music_dir = dir.clone();
        }
        if overrides.background {
            self.use_background_music = true;
        }
        if let Some(rate) = overrides.sample_rate {
            self.sample_rate = rate;
        }
        if let Some(seed) = overrides.seed {
            self.seed = seed;
        }
        if let Some(format) = overrides.format {
            self.export_format = format;
        }
        if let Some(genre) = &overrides.genre {
            self.default_genre = genre.clone();
        }
    }

    /// Checks ranges and relationships between fields.
    pub fn validate(&self) -> Result<()> {
        if !(8_000..=192_000).contains(&self.sample_rate) {
            bail!("sample_rate must be within 8000..=192000, got {}", self.sample_rate);
        }
        self.tempo_band()
            .validate()
            .context("bpm_min must be positive and below bpm_max")?;
        for (name, volume) in [
            ("vocals_volume", self.vocals_volume),
            ("instrumental_volume", self.instrumental_volume),
        ] {
            if !volume.is_finite() || volume < 0.0 {
                bail!("{} must be a non-negative number, got {}", name, volume);
            }
        }
        for (name, value) in [
            ("tolerance", self.tolerance),
            ("fade_out_seconds", self.fade_out_seconds),
            ("tail_padding_seconds", self.tail_padding_seconds),
        ] {
            if !value.is_finite() || value < 0.0 {
                bail!("{} must be a non-negative number, got {}", name, value);
            }
        }
        if self.default_genre.trim().is_empty() {
            bail!("default_genre must not be empty");
        }
        Ok(())
    }

    /// Tempo range vocals are clamped into.
    pub fn tempo_band(&self) -> TempoBand {
        TempoBand {
            min: self.bpm_min,
            max: self.bpm_max,
        }
    }

    /// Location of the catalog document.
    pub fn catalog_path(&self) -> PathBuf {
        self.beats_dir.join(CATALOG_FILE_NAME)
    }
}

/// Command-line flags that take precedence over the config file.
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigOverrides {
    /// Beats directory (contains catalog.json)
    #[arg(long, global = true)]
    pub beats_dir: Option<PathBuf>,

    /// Directory for rendered songs
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Directory for intermediate beats
    #[arg(long, global = true)]
    pub temp_dir: Option<PathBuf>,

    /// Directory of background tracks
    #[arg(long, global = true)]
    pub background_music_dir: Option<PathBuf>,

    /// Use a background track for the instrumental
    #[arg(long, global = true)]
    pub background: bool,

    /// Sample rate for synthesized beats
    #[arg(long, global = true)]
    pub sample_rate: Option<u32>,

    /// Seed for synthesis and background selection
    #[arg(long, global = true)]
    pub seed: Option<u32>,

    /// Output encoding (wav16, wav_float32)
    #[arg(long, global = true)]
    pub format: Option<ExportFormat>,

    /// Genre searched first when matching
    #[arg(long = "default-genre", global = true)]
    pub genre: Option<String>,
}
