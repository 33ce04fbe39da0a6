//! Render command implementation
//!
//! Runs the full pipeline: tempo detection, instrumental selection, mixing.

use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

use super::reporting::print_json;
use crate::config::ShantyConfig;
use crate::pipeline::{read_lyrics, InstrumentalSource, Pipeline, RenderRequest};

/// Run the render command
///
/// # Arguments
/// * `config` - Resolved configuration
/// * `vocal` - Vocal recording
/// * `word` - Subject word for the theme
/// * `lyrics` - Optional lyrics file used to pick the mood
/// * `output` - Output file (default: output dir with a derived name)
/// * `json_output` - Print the pipeline report as JSON
pub fn run(
    config: &ShantyConfig,
    vocal: &str,
    word: &str,
    lyrics: Option<&str>,
    output: Option<&str>,
    json_output: bool,
) -> Result<ExitCode> {
    let pipeline = Pipeline::from_config(config.clone())?;

    let mut request = RenderRequest::new(vocal, word);
    if let Some(text) = read_lyrics(lyrics.map(Path::new))? {
        request = request.with_lyrics(text);
    }
    if let Some(output) = output {
        request = request.with_output(output);
    }

    if !json_output {
        println!("{} '{}' over {}", "Rendering:".cyan().bold(), word, vocal);
    }

    let report = pipeline.render(&request)?;

    if json_output {
        print_json(&report)?;
        return Ok(ExitCode::SUCCESS);
    }

    let tempo = if report.bpm_was_fallback {
        format!("{:.1} BPM (fallback)", report.detected_bpm).yellow()
    } else {
        format!("{:.1} BPM", report.detected_bpm).normal()
    };
    println!("  {} {}", "Detected:".dimmed(), tempo);
    println!("  {} {:.1} BPM", "Target:".dimmed(), report.target_bpm);
    println!(
        "  {} {} (energy {:.2})",
        "Theme:".dimmed(),
        report.theme,
        report.energy
    );
    let source = match &report.instrumental {
        InstrumentalSource::Background { path } => format!("background {}", path.display()),
        InstrumentalSource::Catalog {
            path,
            catalog_bpm,
            stretched,
            ..
        } => format!(
            "catalog {} at {:.1} BPM{}",
            path.display(),
            catalog_bpm,
            if *stretched { ", stretched" } else { "" }
        ),
        InstrumentalSource::Synthesized { theme, duration, bpm } => {
            format!("synthesized {} beat, {:.1}s at {:.1} BPM", theme, duration, bpm)
        }
    };
    println!("  {} {}", "Instrumental:".dimmed(), source);
    println!(
        "{} {} ({:.2}s)",
        "SUCCESS".green().bold(),
        report.output_path.display(),
        report.duration_seconds
    );

    Ok(ExitCode::SUCCESS)
}
