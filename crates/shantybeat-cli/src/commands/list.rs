//! List command implementation

use anyhow::{Context, Result};
use colored::Colorize;
use shantybeat_catalog::Catalog;
use std::process::ExitCode;

use super::reporting::{print_entry, print_json};
use crate::config::ShantyConfig;

/// Run the list command
///
/// # Arguments
/// * `config` - Resolved configuration (catalog location)
/// * `json_output` - Print the catalog document instead of a listing
pub fn run(config: &ShantyConfig, json_output: bool) -> Result<ExitCode> {
    let path = config.catalog_path();
    let catalog =
        Catalog::load(&path).with_context(|| format!("Failed to load catalog: {}", path.display()))?;

    if json_output {
        print_json(&catalog)?;
        return Ok(ExitCode::SUCCESS);
    }

    if catalog.is_empty() {
        println!("{} catalog is empty; run `shantybeat scan`", "!".yellow());
        return Ok(ExitCode::SUCCESS);
    }

    for (genre, entries) in catalog.iter() {
        println!("{} {}", genre.cyan().bold(), format!("({})", entries.len()).dimmed());
        for entry in entries {
            print_entry(entry);
        }
    }
    println!("{} {} beat(s)", "Total:".bold(), catalog.total_entries());

    Ok(ExitCode::SUCCESS)
}
