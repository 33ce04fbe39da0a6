//! Background-music tracks used instead of a matched or synthesized beat.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rand::Rng;
use shantybeat_audio::io::is_audio_file;
use shantybeat_audio::rng::create_component_rng;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{CatalogError, CatalogResult};

/// A flat directory of audio files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundLibrary {
    dir: PathBuf,
}

impl BackgroundLibrary {
    /// Library rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the tracks are read from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Audio files directly inside the directory, sorted by name.
    ///
    /// A missing directory has no tracks.
    pub fn tracks(&self) -> CatalogResult<Vec<PathBuf>> {
        let mut tracks = Vec::new();
        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 && is_not_found(&e) => {
                    warn!(dir = %self.dir.display(), "background music directory not found");
                    return Ok(Vec::new());
                }
                Err(e) => return Err(CatalogError::io(&self.dir, e.into())),
            };
            if entry.file_type().is_file() && is_audio_file(entry.path()) {
                tracks.push(entry.into_path());
            }
        }
        debug!(dir = %self.dir.display(), count = tracks.len(), "background tracks listed");
        Ok(tracks)
    }

    /// Picks one track; the same seed and directory always give the same track.
    pub fn select(&self, seed: u32) -> CatalogResult<Option<PathBuf>> {
        let mut tracks = self.tracks()?;
        if tracks.is_empty() {
            warn!(dir = %self.dir.display(), "no background tracks available");
            return Ok(None);
        }
        let mut rng = create_component_rng(seed, "background");
        let index = rng.gen_range(0..tracks.len());
        let track = tracks.swap_remove(index);
        debug!(track = %track.display(), "background track selected");
        Ok(Some(track))
    }
}

fn is_not_found(err: &walkdir::Error) -> bool {
    err.io_error()
        .is_some_and(|io| io.kind() == ErrorKind::NotFound)
}
