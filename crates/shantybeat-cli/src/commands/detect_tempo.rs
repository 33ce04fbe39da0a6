//! Detect-tempo command implementation
//!
//! Estimates the tempo of an audio file. Unusable audio reports the fallback
//! tempo with its reason instead of failing.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use shantybeat_audio::{load_audio, TempoEstimate, TempoEstimator};
use std::path::Path;
use std::process::ExitCode;

use super::reporting::{print_estimate, print_json};

#[derive(Debug, Serialize)]
struct DetectOutput<'a> {
    input: &'a str,
    duration_seconds: f64,
    sample_rate: u32,
    estimate: TempoEstimate,
}

/// Run the detect-tempo command
///
/// # Arguments
/// * `input` - Path to a WAV, MP3, FLAC or Ogg file
/// * `json_output` - Whether to output machine-readable JSON
pub fn run(input: &str, json_output: bool) -> Result<ExitCode> {
    let buffer = load_audio(Path::new(input))
        .with_context(|| format!("Failed to load audio: {}", input))?;
    let estimate = TempoEstimator::default().estimate(&buffer);

    if json_output {
        print_json(&DetectOutput {
            input,
            duration_seconds: buffer.duration_seconds(),
            sample_rate: buffer.sample_rate,
            estimate,
        })?;
    } else {
        println!("{} {}", "Analyzing:".cyan().bold(), input);
        println!(
            "{} {:.2}s at {} Hz",
            "Length:".dimmed(),
            buffer.duration_seconds(),
            buffer.sample_rate
        );
        print_estimate(&estimate);
    }

    Ok(ExitCode::SUCCESS)
}
