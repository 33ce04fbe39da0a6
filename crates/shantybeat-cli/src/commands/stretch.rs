//! Stretch command implementation
//!
//! Changes the tempo of an audio file.

use anyhow::{Context, Result};
use colored::Colorize;
use shantybeat_audio::{export, load_audio, stretch_to_tempo, ExportFormat, StretchMethod};
use std::path::Path;
use std::process::ExitCode;

use super::reporting::print_written;

/// Run the stretch command
///
/// # Arguments
/// * `input` - Source audio file
/// * `from` - Tempo of the source
/// * `to` - Wanted tempo
/// * `method` - Phase vocoder (keeps pitch) or resample
/// * `output` - Output WAV file
/// * `format` - Output encoding
pub fn run(
    input: &str,
    from: f64,
    to: f64,
    method: StretchMethod,
    output: &str,
    format: ExportFormat,
) -> Result<ExitCode> {
    println!(
        "{} {} from {:.1} to {:.1} BPM ({})",
        "Stretching:".cyan().bold(),
        input,
        from,
        to,
        method
    );

    let buffer =
        load_audio(Path::new(input)).with_context(|| format!("Failed to load audio: {}", input))?;
    let stretched = stretch_to_tempo(&buffer, from, to, method)?;
    let summary = export(&stretched, Path::new(output), format)
        .with_context(|| format!("Failed to write: {}", output))?;
    print_written(&summary);

    Ok(ExitCode::SUCCESS)
}
