//! Shantybeat end-to-end test infrastructure.
//!
//! Scenarios that cross crate boundaries live under `tests/`:
//!
//! - Pipeline: vocal file -> instrumental choice -> mixed song
//! - Catalog: directory scans, persistence and matching on real WAV files
//! - Mixing: length and looping properties
//! - **Determinism**: identical inputs give byte-identical songs
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p shantybeat-tests
//! ```

pub mod determinism;
pub mod fixtures;

pub use determinism::{compute_hash, verify_determinism, DeterminismResult};
pub use fixtures::{click_track, tone, write_wav, BeatLibraryFixture};
