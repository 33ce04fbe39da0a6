//! Catalog entries.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, CatalogResult};

/// One pre-recorded beat. Entries are identified by `filename` within a genre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// File name, unique within its genre.
    pub filename: String,
    /// Absolute path to the audio file.
    #[serde(alias = "absolute_path")]
    pub path: PathBuf,
    /// Measured or declared tempo.
    pub bpm: f64,
    /// Length in seconds; 0.0 when unknown.
    #[serde(default, alias = "duration_seconds")]
    pub duration: f64,
}

impl CatalogEntry {
    /// Creates an entry, taking the file name from `path`.
    pub fn new(path: impl Into<PathBuf>, bpm: f64, duration: f64) -> CatalogResult<Self> {
        let path = path.into();
        let filename = file_name(&path).ok_or_else(|| {
            CatalogError::invalid_entry(path.display().to_string(), "path has no file name")
        })?;
        let entry = Self {
            filename,
            path,
            bpm,
            duration,
        };
        entry.validate()?;
        Ok(entry)
    }

    /// Checks that the tempo is positive and the duration non-negative.
    pub fn validate(&self) -> CatalogResult<()> {
        if !self.bpm.is_finite() || self.bpm <= 0.0 {
            return Err(CatalogError::invalid_entry(
                &self.filename,
                format!("bpm must be positive, got {}", self.bpm),
            ));
        }
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(CatalogError::invalid_entry(
                &self.filename,
                format!("duration must be non-negative, got {}", self.duration),
            ));
        }
        Ok(())
    }

    /// Distance in BPM from `target`.
    pub fn distance(&self, target: f64) -> f64 {
        (self.bpm - target).abs()
    }
}

pub(crate) fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_takes_file_name() {
        let entry = CatalogEntry::new("/beats/pirate-shanty/a.wav", 104.0, 12.5).unwrap();
        assert_eq!(entry.filename, "a.wav");
        assert_eq!(entry.distance(97.0), 7.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(CatalogEntry::new("/beats/a.wav", 0.0, 1.0).is_err());
        assert!(CatalogEntry::new("/beats/a.wav", f64::NAN, 1.0).is_err());
        assert!(CatalogEntry::new("/beats/a.wav", 100.0, -1.0).is_err());
        assert!(CatalogEntry::new("/", 100.0, 1.0).is_err());
    }

    #[test]
    fn test_aliases_accepted() {
        let json = r#"{"filename":"a.wav","absolute_path":"/x/a.wav","bpm":88.0,"duration_seconds":3.0}"#;
        let entry: CatalogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.path, PathBuf::from("/x/a.wav"));
        assert_eq!(entry.duration, 3.0);

        let json = r#"{"filename":"a.wav","path":"/x/a.wav","bpm":88.0}"#;
        let entry: CatalogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.duration, 0.0);
    }
}
