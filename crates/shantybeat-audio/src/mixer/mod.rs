//! Vocal and instrumental mixing.
//!
//! The instrumental is brought to the vocal's sample rate, looped or trimmed
//! to the vocal's exact length, optionally faded out, and overlaid with
//! per-stream gains.

#[allow(clippy::module_inception)]
mod mixer;
mod processing;

#[cfg(test)]
mod tests_mixing;
#[cfg(test)]
mod tests_processing;

pub use mixer::{mix, MixRequest, DEFAULT_INSTRUMENTAL_GAIN, DEFAULT_VOCAL_GAIN};
pub use processing::{db_to_gain, fade_out, gain_to_db, loop_to_length, SILENCE_DB};
