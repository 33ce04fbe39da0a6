use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use shantybeat_audio::{ExportSummary, TempoEstimate};
use shantybeat_catalog::CatalogEntry;

/// Prints `value` as pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

/// One catalog entry on one line.
pub(crate) fn print_entry(entry: &CatalogEntry) {
    println!(
        "  {} {} {}",
        format!("{:>6.1} BPM", entry.bpm).cyan(),
        entry.filename,
        format!("({:.1}s)", entry.duration).dimmed()
    );
}

/// Tempo line with the fallback reason when there is one.
pub(crate) fn print_estimate(estimate: &TempoEstimate) {
    match estimate {
        TempoEstimate::Detected { bpm, strength } => {
            println!(
                "{} {:.1} BPM {}",
                "Tempo:".cyan().bold(),
                bpm,
                format!("(strength {:.2})", strength).dimmed()
            );
        }
        TempoEstimate::Fallback { bpm, reason } => {
            println!(
                "{} {:.1} BPM {}",
                "Tempo:".yellow().bold(),
                bpm,
                format!("(fallback: {})", reason).yellow()
            );
        }
    }
}

/// Where a file went and what it holds.
pub(crate) fn print_written(summary: &ExportSummary) {
    let seconds = summary.num_frames as f64 / summary.sample_rate.max(1) as f64;
    println!(
        "{} {} {}",
        "SUCCESS".green().bold(),
        summary.path.display(),
        format!(
            "({:.2}s, {} Hz, {}, {})",
            seconds,
            summary.sample_rate,
            summary.format,
            &summary.pcm_hash[..16.min(summary.pcm_hash.len())]
        )
        .dimmed()
    );
}
