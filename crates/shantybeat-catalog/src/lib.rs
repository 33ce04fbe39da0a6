//! Shantybeat beat catalog.
//!
//! Pre-recorded beats live in `beats/<genre>/*.wav` and are indexed in
//! `beats/catalog.json`, a genre-keyed JSON document. This crate owns:
//!
//! - [`Catalog`]: the ordered genre to entries map, its persistence and the
//!   closest-tempo matcher
//! - [`scan`]: building and refreshing the catalog from the directory tree
//! - [`SharedCatalog`]: a lock-protected handle for concurrent pipelines
//! - [`BackgroundLibrary`]: the optional background-music directory
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use shantybeat_catalog::{scan_directory, Catalog, TempoAnalyzer, DEFAULT_TOLERANCE};
//!
//! let mut catalog = Catalog::load(Path::new("beats/catalog.json")).unwrap();
//! scan_directory(Path::new("beats"), &mut catalog, &TempoAnalyzer::default()).unwrap();
//! if let Some(beat) = catalog.find_closest(97.0, "pirate-shanty", DEFAULT_TOLERANCE) {
//!     println!("{} at {} BPM", beat.filename, beat.bpm);
//! }
//! ```

pub mod analyzer;
pub mod background;
pub mod catalog;
pub mod entry;
pub mod error;
pub mod scan;
pub mod shared;

pub use analyzer::{BeatAnalyzer, BeatMeasurement, TempoAnalyzer};
pub use background::BackgroundLibrary;
pub use catalog::{Catalog, CATALOG_FILE_NAME, DEFAULT_TOLERANCE};
pub use entry::CatalogEntry;
pub use error::{CatalogError, CatalogResult};
pub use scan::{add_manual, rescan, scan_directory, ScanReport};
pub use shared::SharedCatalog;
