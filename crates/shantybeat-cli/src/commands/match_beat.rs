//! Match command implementation
//!
//! Looks up the catalog beat closest to a tempo.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use shantybeat_catalog::{Catalog, CatalogEntry};
use std::process::ExitCode;

use super::reporting::{print_entry, print_json};
use crate::config::ShantyConfig;

#[derive(Debug, Serialize)]
struct MatchOutput<'a> {
    target_bpm: f64,
    genre: &'a str,
    tolerance: f64,
    #[serde(rename = "match")]
    found: Option<&'a CatalogEntry>,
}

/// Run the match command
///
/// # Arguments
/// * `config` - Resolved configuration (catalog, default genre and tolerance)
/// * `bpm` - Target tempo
/// * `genre` - Genre to search first (default: configured genre)
/// * `tolerance` - Largest accepted distance (default: configured tolerance)
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 when a beat matched, 1 otherwise
pub fn run(
    config: &ShantyConfig,
    bpm: f64,
    genre: Option<&str>,
    tolerance: Option<f64>,
    json_output: bool,
) -> Result<ExitCode> {
    let path = config.catalog_path();
    let catalog =
        Catalog::load(&path).with_context(|| format!("Failed to load catalog: {}", path.display()))?;
    let genre = genre.unwrap_or(&config.default_genre);
    let tolerance = tolerance.unwrap_or(config.tolerance);

    let found = catalog.find_closest(bpm, genre, tolerance);

    if json_output {
        print_json(&MatchOutput {
            target_bpm: bpm,
            genre,
            tolerance,
            found,
        })?;
    } else {
        println!(
            "{} {:.1} BPM in '{}' (±{:.1})",
            "Matching:".cyan().bold(),
            bpm,
            genre,
            tolerance
        );
        match found {
            Some(entry) => {
                print_entry(entry);
                println!("  {} {}", "Path:".dimmed(), entry.path.display());
            }
            None => println!("  {} no beat within tolerance", "!".yellow()),
        }
    }

    Ok(if found.is_some() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}
