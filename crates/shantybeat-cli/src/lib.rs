//! Shantybeat CLI library.
//!
//! Configuration, the vocal-to-song [`pipeline`] and the command
//! implementations behind the `shantybeat` binary.

pub mod commands;
pub mod config;
pub mod pipeline;

pub use config::{ConfigOverrides, ShantyConfig};
pub use pipeline::{InstrumentalSource, MixedSong, Pipeline, PipelineReport, RenderRequest};
