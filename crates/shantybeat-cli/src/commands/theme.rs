//! Theme command implementation
//!
//! Shows the theme, mood, energy and voices a word (and optional lyrics)
//! resolve to.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use shantybeat_spec::{adjust_energy_for_bpm, MoodAnalysis, MoodAnalyzer, ThemeProfile};
use std::path::Path;
use std::process::ExitCode;

use super::reporting::print_json;
use crate::pipeline::read_lyrics;

#[derive(Debug, Serialize)]
struct ThemeOutput {
    word: String,
    profile: ThemeProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    lyrics: Option<MoodAnalysis>,
}

/// Run the theme command
///
/// # Arguments
/// * `word` - Subject word
/// * `lyrics` - Optional lyrics file for mood analysis
/// * `bpm` - Optional tempo used to nudge energy
/// * `json_output` - Whether to output machine-readable JSON
pub fn run(word: &str, lyrics: Option<&str>, bpm: Option<f64>, json_output: bool) -> Result<ExitCode> {
    let mut profile = ThemeProfile::for_word(word);
    let analysis = read_lyrics(lyrics.map(Path::new))?.map(|text| MoodAnalyzer::new().analyze(&text));
    if let Some(analysis) = &analysis {
        profile = profile.with_mood(analysis.mood).with_energy(analysis.energy)?;
    }
    if let Some(bpm) = bpm {
        let energy = adjust_energy_for_bpm(profile.energy, bpm);
        profile = profile.with_energy(energy)?;
    }

    if json_output {
        print_json(&ThemeOutput {
            word: word.to_string(),
            profile,
            lyrics: analysis,
        })?;
        return Ok(ExitCode::SUCCESS);
    }

    println!("{} {}", "Word:".cyan().bold(), word);
    println!("  {} {}", "Theme:".dimmed(), profile.theme);
    println!("  {} {}", "Mood:".dimmed(), profile.mood);
    println!("  {} {:.2}", "Energy:".dimmed(), profile.energy);
    if let Some(analysis) = &analysis {
        println!("  {} {:.2}", "Confidence:".dimmed(), analysis.confidence);
    }
    println!("  {}", "Voices:".dimmed());
    for spec in &profile.instruments {
        println!("    {} {}", spec.kind, format!("x{:.2}", spec.weight).dimmed());
    }

    Ok(ExitCode::SUCCESS)
}
