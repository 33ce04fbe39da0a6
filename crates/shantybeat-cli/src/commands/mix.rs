//! Mix command implementation
//!
//! Lays an instrumental under a vocal using the configured gains.

use anyhow::{Context, Result};
use colored::Colorize;
use shantybeat_audio::{export, load_audio, MixRequest};
use std::path::Path;
use std::process::ExitCode;

use super::reporting::print_written;
use crate::config::ShantyConfig;

/// Run the mix command
///
/// # Arguments
/// * `config` - Resolved configuration (volumes, format)
/// * `vocal` - Vocal file; sets the output length and sample rate
/// * `instrumental` - Instrumental file, looped or trimmed to the vocal
/// * `output` - Output WAV file
/// * `fade_out` - Instrumental fade-out in seconds
pub fn run(
    config: &ShantyConfig,
    vocal: &str,
    instrumental: &str,
    output: &str,
    fade_out: f64,
) -> Result<ExitCode> {
    println!("{}", "Mixing:".cyan().bold());
    println!("  {} {}", "Vocal:".dimmed(), vocal);
    println!("  {} {}", "Instrumental:".dimmed(), instrumental);

    let vocal_audio =
        load_audio(Path::new(vocal)).with_context(|| format!("Failed to load vocal: {}", vocal))?;
    let instrumental_audio = load_audio(Path::new(instrumental))
        .with_context(|| format!("Failed to load instrumental: {}", instrumental))?;

    let mixed = MixRequest::new(vocal_audio, instrumental_audio)
        .vocal_gain(config.vocals_volume)
        .instrumental_gain(config.instrumental_volume)
        .fade_out(fade_out)
        .mix()?;
    let summary = export(&mixed, Path::new(output), config.export_format)
        .with_context(|| format!("Failed to write: {}", output))?;
    print_written(&summary);

    Ok(ExitCode::SUCCESS)
}
