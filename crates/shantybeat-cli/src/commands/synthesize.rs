//! Synthesize command implementation
//!
//! Renders a themed beat for a subject word and writes it to disk.

use anyhow::{Context, Result};
use colored::Colorize;
use shantybeat_audio::{export, BeatSynthesizer, SynthesisRequest};
use shantybeat_spec::ThemeProfile;
use std::path::PathBuf;
use std::process::ExitCode;

use super::reporting::print_written;
use crate::config::ShantyConfig;

/// Run the synthesize command
///
/// # Arguments
/// * `config` - Resolved configuration (sample rate, seed, temp dir, format)
/// * `word` - Subject word the theme is chosen from
/// * `duration` - Beat length in seconds
/// * `bpm` - Beat tempo
/// * `energy` - Energy override in `[0, 1]`
/// * `output` - Output file (default: temp dir with a derived name)
pub fn run(
    config: &ShantyConfig,
    word: &str,
    duration: f64,
    bpm: f64,
    energy: Option<f64>,
    output: Option<&str>,
) -> Result<ExitCode> {
    let mut profile = ThemeProfile::for_word(word);
    if let Some(energy) = energy {
        profile = profile.with_energy(energy)?;
    }

    println!(
        "{} '{}' as {} ({}, energy {:.2})",
        "Synthesizing:".cyan().bold(),
        word,
        profile.theme,
        profile.mood,
        profile.energy
    );

    let synth = BeatSynthesizer::new(config.sample_rate, &config.temp_dir)?;
    let request = SynthesisRequest::new(profile, duration, bpm).with_seed(config.seed);
    let buffer = synth.synthesize(&request).context("Failed to synthesize beat")?;

    let path = match output {
        Some(path) => PathBuf::from(path),
        None => config.temp_dir.join(request.default_file_name()),
    };
    let summary = export(&buffer, &path, config.export_format)
        .with_context(|| format!("Failed to write beat: {}", path.display()))?;
    print_written(&summary);

    Ok(ExitCode::SUCCESS)
}
