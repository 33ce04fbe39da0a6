//! The genre-ordered beat catalog, its JSON form and the tempo matcher.

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use shantybeat_audio::write_atomic;
use tracing::{debug, info, warn};

use crate::entry::CatalogEntry;
use crate::error::{CatalogError, CatalogResult};

/// Default matching tolerance in BPM.
pub const DEFAULT_TOLERANCE: f64 = 15.0;

/// File name of the catalog document inside the beats directory.
pub const CATALOG_FILE_NAME: &str = "catalog.json";

/// Genre name to ordered beat list.
///
/// Genres keep the order they were first added in, and entries keep their
/// insertion order within a genre. Both orders survive a JSON round trip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    genres: Vec<(String, Vec<CatalogEntry>)>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a catalog document. A missing file is an empty catalog.
    pub fn load(path: &Path) -> CatalogResult<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no catalog file, starting empty");
                return Ok(Self::new());
            }
            Err(e) => return Err(CatalogError::io(path, e)),
        };

        let catalog = Self::from_json(&text).map_err(|source| CatalogError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        catalog.validate()?;
        debug!(
            path = %path.display(),
            genres = catalog.genres.len(),
            entries = catalog.total_entries(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Rewrites the whole document at `path` in one step.
    pub fn save(&self, path: &Path) -> CatalogResult<()> {
        let json = self.to_json()?;
        write_atomic(path, json.as_bytes())?;
        info!(path = %path.display(), entries = self.total_entries(), "catalog saved");
        Ok(())
    }

    /// Parses a catalog document.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Checks every entry's tempo and duration.
    pub fn validate(&self) -> CatalogResult<()> {
        self.genres
            .iter()
            .flat_map(|(_, entries)| entries)
            .try_for_each(CatalogEntry::validate)
    }

    /// Pretty JSON with two-space indentation.
    pub fn to_json(&self) -> CatalogResult<String> {
        serde_json::to_string_pretty(self).map_err(CatalogError::Serialize)
    }

    /// True when there are no genres at all.
    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
    }

    /// Genre names in catalog order.
    pub fn genres(&self) -> impl Iterator<Item = &str> {
        self.genres.iter().map(|(name, _)| name.as_str())
    }

    /// Genres with their entries, in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[CatalogEntry])> {
        self.genres
            .iter()
            .map(|(name, entries)| (name.as_str(), entries.as_slice()))
    }

    /// Whether `genre` is present, even with no entries.
    pub fn has_genre(&self, genre: &str) -> bool {
        self.position(genre).is_some()
    }

    /// Entries of `genre`; empty when the genre is unknown.
    pub fn entries(&self, genre: &str) -> &[CatalogEntry] {
        match self.position(genre) {
            Some(idx) => &self.genres[idx].1,
            None => &[],
        }
    }

    /// Number of entries across all genres.
    pub fn total_entries(&self) -> usize {
        self.genres.iter().map(|(_, entries)| entries.len()).sum()
    }

    /// Whether `genre` already lists `filename`.
    pub fn contains(&self, genre: &str, filename: &str) -> bool {
        self.entries(genre).iter().any(|e| e.filename == filename)
    }

    /// Adds `genre` at the end if it is not present yet.
    pub fn ensure_genre(&mut self, genre: &str) {
        self.genre_mut(genre);
    }

    /// Appends `entry` to `genre`, creating the genre if needed.
    ///
    /// Returns `false` without changing anything when the genre already has
    /// an entry with the same file name.
    pub fn insert(&mut self, genre: &str, entry: CatalogEntry) -> CatalogResult<bool> {
        entry.validate()?;
        let entries = self.genre_mut(genre);
        if entries.iter().any(|e| e.filename == entry.filename) {
            return Ok(false);
        }
        debug!(genre, filename = %entry.filename, bpm = entry.bpm, "catalog entry added");
        entries.push(entry);
        Ok(true)
    }

    /// Removes the entry named `filename` from `genre`.
    pub fn remove(&mut self, genre: &str, filename: &str) -> Option<CatalogEntry> {
        let idx = self.position(genre)?;
        let entries = &mut self.genres[idx].1;
        let pos = entries.iter().position(|e| e.filename == filename)?;
        let removed = entries.remove(pos);
        info!(genre, filename, "catalog entry removed");
        Some(removed)
    }

    /// Finds the entry whose tempo is closest to `target_bpm`.
    ///
    /// Only `genre` is searched when it has entries; otherwise every genre is,
    /// in catalog order. The first entry wins a tie. Returns `None` when the
    /// closest entry is more than `tolerance` BPM away or nothing is listed.
    ///
    /// # Arguments
    /// * `target_bpm` - Tempo to match
    /// * `genre` - Genre to search first
    /// * `tolerance` - Largest accepted distance in BPM, inclusive
    ///
    /// # Returns
    /// The closest entry, or `None` on a miss
    pub fn find_closest(&self, target_bpm: f64, genre: &str, tolerance: f64) -> Option<&CatalogEntry> {
        let preferred = self.entries(genre);
        let best = if preferred.is_empty() {
            warn!(genre, "no beats in genre, searching all genres");
            closest(self.genres.iter().flat_map(|(_, e)| e.iter()), target_bpm)
        } else {
            closest(preferred.iter(), target_bpm)
        };

        let Some(best) = best else {
            warn!("catalog has no beats");
            return None;
        };

        let distance = best.distance(target_bpm);
        if distance <= tolerance {
            info!(
                filename = %best.filename,
                bpm = best.bpm,
                target_bpm,
                distance,
                "matched catalog beat"
            );
            Some(best)
        } else {
            warn!(
                filename = %best.filename,
                bpm = best.bpm,
                target_bpm,
                tolerance,
                "closest beat is outside tolerance"
            );
            None
        }
    }

    /// Path of the closest beat in `genre` within [`DEFAULT_TOLERANCE`].
    pub fn beat_path(&self, genre: &str, bpm: f64) -> Option<&Path> {
        self.find_closest(bpm, genre, DEFAULT_TOLERANCE)
            .map(|entry| entry.path.as_path())
    }

    pub(crate) fn entries_mut(&mut self) -> impl Iterator<Item = &mut CatalogEntry> {
        self.genres.iter_mut().flat_map(|(_, entries)| entries.iter_mut())
    }

    fn position(&self, genre: &str) -> Option<usize> {
        self.genres.iter().position(|(name, _)| name == genre)
    }

    fn genre_mut(&mut self, genre: &str) -> &mut Vec<CatalogEntry> {
        let idx = match self.position(genre) {
            Some(idx) => idx,
            None => {
                self.genres.push((genre.to_string(), Vec::new()));
                self.genres.len() - 1
            }
        };
        &mut self.genres[idx].1
    }
}

fn closest<'a>(
    entries: impl Iterator<Item = &'a CatalogEntry>,
    target_bpm: f64,
) -> Option<&'a CatalogEntry> {
    entries.fold(None, |best, entry| match best {
        Some(b) if b.distance(target_bpm) <= entry.distance(target_bpm) => Some(b),
        _ => Some(entry),
    })
}

impl Serialize for Catalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.genres.len()))?;
        for (genre, entries) in &self.genres {
            map.serialize_entry(genre, entries)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CatalogVisitor)
    }
}

struct CatalogVisitor;

impl<'de> Visitor<'de> for CatalogVisitor {
    type Value = Catalog;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of genre names to beat lists")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Catalog, A::Error> {
        let mut catalog = Catalog::new();
        while let Some((genre, entries)) = access.next_entry::<String, Vec<CatalogEntry>>()? {
            let slot = catalog.genre_mut(&genre);
            for entry in entries {
                if slot.iter().any(|e| e.filename == entry.filename) {
                    warn!(
                        genre = %genre,
                        filename = %entry.filename,
                        "duplicate catalog entry dropped"
                    );
                    continue;
                }
                slot.push(entry);
            }
        }
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shantybeat_spec::BackendError;
    use std::path::PathBuf;

    fn entry(name: &str, bpm: f64) -> CatalogEntry {
        CatalogEntry::new(format!("/beats/{}", name), bpm, 10.0).unwrap()
    }

    fn shanty_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        for (name, bpm) in [("slow.wav", 88.0), ("mid.wav", 104.0), ("fast.wav", 150.0)] {
            catalog.insert("pirate-shanty", entry(name, bpm)).unwrap();
        }
        catalog
    }

    #[test]
    fn test_closest_within_tolerance() {
        let catalog = shanty_catalog();
        let found = catalog.find_closest(97.0, "pirate-shanty", 15.0).unwrap();
        assert_eq!(found.filename, "mid.wav");
        assert!(catalog.find_closest(97.0, "pirate-shanty", 5.0).is_none());
    }

    #[test]
    fn test_tolerance_is_inclusive() {
        let catalog = shanty_catalog();
        assert!(catalog.find_closest(97.0, "pirate-shanty", 7.0).is_some());
        assert!(catalog.find_closest(97.0, "pirate-shanty", 6.999).is_none());
    }

    #[test]
    fn test_tie_goes_to_first_inserted() {
        let mut catalog = Catalog::new();
        catalog.insert("g", entry("under.wav", 90.0)).unwrap();
        catalog.insert("g", entry("over.wav", 110.0)).unwrap();
        let found = catalog.find_closest(100.0, "g", 15.0).unwrap();
        assert_eq!(found.filename, "under.wav");
    }

    #[test]
    fn test_unknown_genre_searches_everything() {
        let mut catalog = shanty_catalog();
        catalog.insert("sea-songs", entry("sea.wav", 96.0)).unwrap();
        catalog.ensure_genre("empty");

        let found = catalog.find_closest(97.0, "empty", 15.0).unwrap();
        assert_eq!(found.filename, "sea.wav");
        let found = catalog.find_closest(97.0, "missing", 15.0).unwrap();
        assert_eq!(found.filename, "sea.wav");
        // The preferred genre is not widened when it has entries.
        let found = catalog.find_closest(97.0, "pirate-shanty", 15.0).unwrap();
        assert_eq!(found.filename, "mid.wav");
    }

    #[test]
    fn test_empty_catalog_matches_nothing() {
        let catalog = Catalog::new();
        assert!(catalog.find_closest(100.0, "pirate-shanty", 1000.0).is_none());
        assert!(catalog.beat_path("pirate-shanty", 100.0).is_none());
    }

    #[test]
    fn test_beat_path_uses_default_tolerance() {
        let catalog = shanty_catalog();
        assert_eq!(
            catalog.beat_path("pirate-shanty", 118.0),
            Some(Path::new("/beats/mid.wav"))
        );
        assert_eq!(catalog.beat_path("pirate-shanty", 127.0), None);
    }

    #[test]
    fn test_duplicate_filename_not_inserted() {
        let mut catalog = shanty_catalog();
        assert!(!catalog.insert("pirate-shanty", entry("mid.wav", 60.0)).unwrap());
        assert_eq!(catalog.total_entries(), 3);
        // Same file name is fine in another genre.
        assert!(catalog.insert("other", entry("mid.wav", 60.0)).unwrap());
        assert_eq!(catalog.total_entries(), 4);
    }

    #[test]
    fn test_remove() {
        let mut catalog = shanty_catalog();
        let removed = catalog.remove("pirate-shanty", "slow.wav").unwrap();
        assert_eq!(removed.bpm, 88.0);
        assert!(catalog.remove("pirate-shanty", "slow.wav").is_none());
        assert!(catalog.remove("nope", "mid.wav").is_none());
        assert_eq!(catalog.total_entries(), 2);
        assert!(catalog.has_genre("pirate-shanty"));
    }

    #[test]
    fn test_json_preserves_order() {
        let mut catalog = Catalog::new();
        catalog.insert("zulu", entry("z2.wav", 100.0)).unwrap();
        catalog.insert("zulu", entry("z1.wav", 101.0)).unwrap();
        catalog.insert("alpha", entry("a.wav", 99.0)).unwrap();
        catalog.ensure_genre("middle");

        let json = catalog.to_json().unwrap();
        assert!(json.find("zulu").unwrap() < json.find("alpha").unwrap());
        assert!(json.contains("\n  \"zulu\": [\n"));

        let parsed = Catalog::from_json(&json).unwrap();
        assert_eq!(parsed, catalog);
        assert_eq!(parsed.genres().collect::<Vec<_>>(), vec!["zulu", "alpha", "middle"]);
        let names: Vec<_> = parsed.entries("zulu").iter().map(|e| e.filename.as_str()).collect();
        assert_eq!(names, vec!["z2.wav", "z1.wav"]);
    }

    #[test]
    fn test_load_missing_and_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        assert!(Catalog::load(&path).unwrap().is_empty());

        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Catalog::load(&path), Err(CatalogError::Parse { .. })));

        std::fs::write(&path, "[]").unwrap();
        assert!(matches!(Catalog::load(&path), Err(CatalogError::Parse { .. })));
    }

    #[test]
    fn test_load_rejects_invalid_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        for bad in [
            r#"{"sea": [{"filename": "a.wav", "path": "/b/a.wav", "bpm": -5.0, "duration": 1.0}]}"#,
            r#"{"sea": [{"filename": "a.wav", "path": "/b/a.wav", "bpm": 0.0, "duration": 1.0}]}"#,
            r#"{"sea": [{"filename": "a.wav", "path": "/b/a.wav", "bpm": 90.0, "duration": -1.0}]}"#,
        ] {
            std::fs::write(&path, bad).unwrap();
            let err = Catalog::load(&path).unwrap_err();
            assert!(matches!(err, CatalogError::InvalidEntry { .. }), "{}", bad);
            assert_eq!(err.code(), "CATALOG_005");
        }
    }

    #[test]
    fn test_duplicate_filenames_in_document_keep_first() {
        let json = r#"{
            "sea": [
                {"filename": "a.wav", "path": "/one/a.wav", "bpm": 90.0, "duration": 1.0},
                {"filename": "a.wav", "path": "/two/a.wav", "bpm": 120.0, "duration": 1.0}
            ]
        }"#;
        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.entries("sea").len(), 1);
        assert_eq!(catalog.entries("sea")[0].path, PathBuf::from("/one/a.wav"));
        assert!(catalog.validate().is_ok());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("catalog.json");
        let catalog = shanty_catalog();
        catalog.save(&path).unwrap();

        let loaded = Catalog::load(&path).unwrap();
        assert_eq!(loaded, catalog);
        assert_eq!(loaded.entries("pirate-shanty")[0].path, PathBuf::from("/beats/slow.wav"));

        let leftovers: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("catalog.json")]);
    }

    #[test]
    fn test_original_field_names_load() {
        let json = r#"{
            "pirate-shanty": [
                {"filename": "a.wav", "absolute_path": "/b/a.wav", "bpm": 92.3, "duration_seconds": 30.0}
            ]
        }"#;
        let catalog = Catalog::from_json(json).unwrap();
        let entry = &catalog.entries("pirate-shanty")[0];
        assert_eq!(entry.duration, 30.0);
        assert_eq!(entry.path, PathBuf::from("/b/a.wav"));
    }
}
