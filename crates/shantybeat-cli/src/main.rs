//! Shantybeat CLI - tempo-matched beats for sung vocals
//!
//! This binary provides commands for tempo detection, beat synthesis,
//! catalog management, stretching, mixing and the full render pipeline.

mod cli_args;

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use cli_args::{Cli, Commands};
use shantybeat_cli::{commands, ShantyConfig};

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = ShantyConfig::resolve(cli.config.as_deref(), &cli.overrides)?;

    match cli.command {
        Commands::DetectTempo { input, json } => commands::detect_tempo::run(&input, json),
        Commands::Synthesize {
            word,
            duration,
            bpm,
            energy,
            output,
        } => commands::synthesize::run(&config, &word, duration, bpm, energy, output.as_deref()),
        Commands::Scan { refresh, json } => commands::scan::run(&config, refresh, json),
        Commands::List { json } => commands::list::run(&config, json),
        Commands::Match {
            bpm,
            genre,
            tolerance,
            json,
        } => commands::match_beat::run(&config, bpm, genre.as_deref(), tolerance, json),
        Commands::Add { file, genre, bpm } => commands::add::run(&config, &file, &genre, bpm),
        Commands::Stretch {
            input,
            from,
            to,
            method,
            output,
        } => commands::stretch::run(&input, from, to, method, &output, config.export_format),
        Commands::Mix {
            vocal,
            instrumental,
            output,
            fade_out,
        } => commands::mix::run(&config, &vocal, &instrumental, &output, fade_out),
        Commands::Render {
            vocal,
            word,
            lyrics,
            output,
            json,
        } => commands::render::run(
            &config,
            &vocal,
            &word,
            lyrics.as_deref(),
            output.as_deref(),
            json,
        ),
        Commands::Theme {
            word,
            lyrics,
            bpm,
            json,
        } => commands::theme::run(&word, lyrics.as_deref(), bpm, json),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
