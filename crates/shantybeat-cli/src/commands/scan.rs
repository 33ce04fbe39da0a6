//! Scan command implementation
//!
//! Measures every new beat under the beats directory and saves the catalog.

use anyhow::{Context, Result};
use colored::Colorize;
use shantybeat_catalog::{SharedCatalog, TempoAnalyzer};
use std::fs;
use std::process::ExitCode;

use super::reporting::print_json;
use crate::config::ShantyConfig;

/// Run the scan command
///
/// # Arguments
/// * `config` - Resolved configuration (beats dir, default genre)
/// * `refresh` - Re-measure entries already in the catalog
/// * `json_output` - Whether to output machine-readable JSON
pub fn run(config: &ShantyConfig, refresh: bool, json_output: bool) -> Result<ExitCode> {
    let default_dir = config.beats_dir.join(&config.default_genre);
    fs::create_dir_all(&default_dir)
        .with_context(|| format!("Failed to create beats directory: {}", default_dir.display()))?;

    let catalog_path = config.catalog_path();
    let catalog = SharedCatalog::load(&catalog_path)
        .with_context(|| format!("Failed to load catalog: {}", catalog_path.display()))?;

    if !json_output {
        println!("{} {}", "Scanning:".cyan().bold(), config.beats_dir.display());
    }

    let report = catalog
        .rescan(&config.beats_dir, &TempoAnalyzer::default(), refresh)
        .with_context(|| format!("Failed to scan: {}", config.beats_dir.display()))?;
    catalog.save(&catalog_path)?;

    if json_output {
        print_json(&report)?;
        return Ok(ExitCode::SUCCESS);
    }

    let snapshot = catalog.snapshot();
    for (genre, entries) in snapshot.iter() {
        println!("  {} {} beat(s)", format!("{}:", genre).bold(), entries.len());
    }
    println!(
        "{} {} added, {} already listed, {} failed{}",
        "Scan complete:".green().bold(),
        report.added,
        report.skipped,
        report.failed,
        if refresh {
            format!(", {} refreshed", report.refreshed)
        } else {
            String::new()
        }
    );
    if snapshot.total_entries() == 0 {
        println!(
            "{} no WAV files found; add beats under {}",
            "!".yellow(),
            default_dir.display()
        );
    }
    println!("{} {}", "Catalog:".dimmed(), catalog_path.display());

    Ok(if report.failed > 0 {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    })
}
