//! CLI command implementations

pub mod add;
pub mod detect_tempo;
pub mod list;
pub mod match_beat;
pub mod mix;
pub mod render;
pub mod scan;
pub mod stretch;
pub mod synthesize;
pub mod theme;

mod reporting;
