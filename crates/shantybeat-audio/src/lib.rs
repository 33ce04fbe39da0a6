//! Shantybeat audio backend.
//!
//! Signal processing for the beat pipeline:
//!
//! - [`generate`]: themed beat synthesis from instrument [`voices`]
//! - [`tempo`]: onset-autocorrelation tempo estimation with explicit fallback
//! - [`stretch`]: phase-vocoder time stretching and linear resampling
//! - [`mixer`]: looping, gain and overlay of a vocal and an instrumental
//! - [`io`]: WAV and compressed input, atomic WAV export
//!
//! All randomness flows through [`rng`], so a given seed always produces the
//! same samples.
//!
//! # Example
//!
//! ```no_run
//! use shantybeat_audio::{BeatSynthesizer, SynthesisRequest};
//! use shantybeat_spec::ThemeProfile;
//!
//! let synth = BeatSynthesizer::new(24_000, "temp").unwrap();
//! let request = SynthesisRequest::new(ThemeProfile::for_word("ship"), 12.0, 97.0);
//! let beat = synth.synthesize(&request).unwrap();
//! assert_eq!(beat.len(), 288_000);
//! ```

pub mod buffer;
pub mod envelope;
pub mod error;
pub mod generate;
pub mod io;
pub mod mixer;
pub mod oscillator;
pub mod rng;
pub mod stft;
pub mod stretch;
pub mod tempo;
pub mod voices;
pub mod wav;

pub use buffer::AudioBuffer;
pub use error::{AudioError, AudioResult};
pub use generate::{BeatSynthesizer, SynthesisRequest, DEFAULT_SAMPLE_RATE, HEADROOM};
pub use io::{export, load_audio, write_atomic, ExportFormat, ExportSummary};
pub use mixer::{mix, MixRequest};
pub use stretch::{resample, stretch_to_tempo, StretchMethod};
pub use tempo::{estimate_tempo, estimate_tempo_file, FallbackReason, TempoEstimate, TempoEstimator};
pub use wav::WavResult;
