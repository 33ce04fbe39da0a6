//! CLI argument definitions for the shantybeat command-line interface.
//!
//! All `#[derive(Parser)]` and `#[derive(Subcommand)]` types are defined here,
//! keeping `main.rs` focused on dispatch logic.

use clap::{Parser, Subcommand};
use shantybeat_audio::StretchMethod;
use shantybeat_cli::ConfigOverrides;
use std::path::PathBuf;

/// Shantybeat - tempo-matched beats for sung vocals
#[derive(Parser)]
#[command(name = "shantybeat")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    /// Configuration file (JSON); unset fields keep their defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level (RUST_LOG is used otherwise)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub overrides: ConfigOverrides,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Estimate the tempo of an audio file
    DetectTempo {
        /// Audio file (WAV, MP3, FLAC or Ogg)
        #[arg(short, long)]
        input: String,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Synthesize a themed beat for a word
    Synthesize {
        /// Subject word the theme is chosen from
        #[arg(short, long)]
        word: String,

        /// Length in seconds
        #[arg(short, long)]
        duration: f64,

        /// Tempo in beats per minute
        #[arg(short, long)]
        bpm: f64,

        /// Energy in [0, 1] (default: the theme's mood energy)
        #[arg(short, long)]
        energy: Option<f64>,

        /// Output file (default: temp directory)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Measure new beats under the beats directory and update the catalog
    Scan {
        /// Re-measure beats already in the catalog
        #[arg(long)]
        refresh: bool,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// List catalog beats by genre
    List {
        /// Print the catalog document as JSON
        #[arg(long)]
        json: bool,
    },

    /// Find the catalog beat closest to a tempo
    Match {
        /// Target tempo
        #[arg(short, long)]
        bpm: f64,

        /// Genre to search first (default: configured genre)
        #[arg(short, long)]
        genre: Option<String>,

        /// Largest accepted BPM distance (default: configured tolerance)
        #[arg(short, long)]
        tolerance: Option<f64>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Add a beat to the catalog with a known tempo
    Add {
        /// Beat file
        #[arg(short, long)]
        file: String,

        /// Genre to list it under
        #[arg(short, long)]
        genre: String,

        /// Tempo of the beat
        #[arg(short, long)]
        bpm: f64,
    },

    /// Change the tempo of an audio file
    Stretch {
        /// Source audio file
        #[arg(short, long)]
        input: String,

        /// Tempo of the source
        #[arg(long)]
        from: f64,

        /// Wanted tempo
        #[arg(long)]
        to: f64,

        /// Stretch method (phase_vocoder, resample)
        #[arg(short, long, default_value = "phase_vocoder")]
        method: StretchMethod,

        /// Output WAV file
        #[arg(short, long)]
        output: String,
    },

    /// Mix an instrumental under a vocal
    Mix {
        /// Vocal file; sets the output length
        #[arg(long)]
        vocal: String,

        /// Instrumental file, looped or trimmed to the vocal
        #[arg(long)]
        instrumental: String,

        /// Output WAV file
        #[arg(short, long)]
        output: String,

        /// Instrumental fade-out in seconds
        #[arg(long, default_value_t = 0.0)]
        fade_out: f64,
    },

    /// Render a finished song from a vocal recording
    Render {
        /// Vocal recording
        #[arg(long)]
        vocal: String,

        /// Subject word the theme is chosen from
        #[arg(short, long)]
        word: String,

        /// Lyrics file used to pick the mood
        #[arg(short, long)]
        lyrics: Option<String>,

        /// Output file (default: output directory)
        #[arg(short, long)]
        output: Option<String>,

        /// Print the pipeline report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the theme, mood and voices for a word
    Theme {
        /// Subject word
        #[arg(short, long)]
        word: String,

        /// Lyrics file for mood analysis
        #[arg(short, long)]
        lyrics: Option<String>,

        /// Vocal tempo used to nudge energy
        #[arg(short, long)]
        bpm: Option<f64>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },
}
