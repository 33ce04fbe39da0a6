//! Shantybeat domain types.
//!
//! This crate holds the vocabulary shared by the audio, catalog and CLI crates:
//!
//! - **Themes** - subject words are bucketed into a [`Theme`], which selects an
//!   ordered list of instrument voices and a default [`Mood`]
//! - **Moods** - each mood carries a default energy in `[0.0, 1.0]`
//! - **Tempo bands** - the BPM range generated and matched beats are clamped to
//!
//! # Example
//!
//! ```
//! use shantybeat_spec::{ThemeProfile, Theme, TempoBand};
//!
//! let profile = ThemeProfile::for_word("treasure");
//! assert_eq!(profile.theme, Theme::Treasure);
//! assert!(!profile.instruments.is_empty());
//!
//! let band = TempoBand::default();
//! assert_eq!(band.clamp(130.0), 110.0);
//! ```
//!
//! # Modules
//!
//! - [`error`]: Error types and the [`BackendError`] reporting trait
//! - [`theme`]: Themes, instruments and theme profiles
//! - [`mood`]: Mood keyword analysis for lyrics
//! - [`tempo`]: Tempo band and fallback tempo constants

pub mod error;
pub mod mood;
pub mod tempo;
pub mod theme;

pub use error::{BackendError, SpecError, SpecResult};
pub use mood::{adjust_energy_for_bpm, MoodAnalysis, MoodAnalyzer};
pub use tempo::{TempoBand, FALLBACK_BPM};
pub use theme::{InstrumentKind, InstrumentSpec, Mood, Theme, ThemeProfile};
