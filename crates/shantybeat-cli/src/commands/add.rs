//! Add command implementation
//!
//! Lists a beat in the catalog with a declared tempo.

use anyhow::{Context, Result};
use colored::Colorize;
use shantybeat_catalog::{SharedCatalog, TempoAnalyzer};
use std::path::Path;
use std::process::ExitCode;

use crate::config::ShantyConfig;

/// Run the add command
///
/// # Arguments
/// * `config` - Resolved configuration (catalog location)
/// * `file` - Beat file to list
/// * `genre` - Genre to list it under
/// * `bpm` - Declared tempo
pub fn run(config: &ShantyConfig, file: &str, genre: &str, bpm: f64) -> Result<ExitCode> {
    let catalog_path = config.catalog_path();
    let catalog = SharedCatalog::load(&catalog_path)
        .with_context(|| format!("Failed to load catalog: {}", catalog_path.display()))?;

    let added = catalog
        .add_manual(Path::new(file), genre, bpm, &TempoAnalyzer::default())
        .with_context(|| format!("Failed to add beat: {}", file))?;

    if !added {
        println!(
            "{} '{}' is already listed under '{}'",
            "!".yellow(),
            file,
            genre
        );
        return Ok(ExitCode::SUCCESS);
    }

    catalog.save(&catalog_path)?;
    println!(
        "{} {} added to '{}' at {:.1} BPM",
        "SUCCESS".green().bold(),
        file,
        genre,
        bpm
    );
    Ok(ExitCode::SUCCESS)
}
