//! Building the catalog from a directory tree of genre folders.
//!
//! The layout is `root/<genre>/*.wav`. Every visible subdirectory of the
//! root is a genre, even when it holds no beats yet. Directories and files
//! are visited in file-name order, so a scan of the same tree always
//! produces the same catalog.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::analyzer::BeatAnalyzer;
use crate::catalog::Catalog;
use crate::entry::{file_name, CatalogEntry};
use crate::error::{CatalogError, CatalogResult};

/// Outcome counts of one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    /// Genre directories visited.
    pub genres: usize,
    /// New entries appended.
    pub added: usize,
    /// Files already listed in their genre.
    pub skipped: usize,
    /// Files or directories that could not be read or measured.
    pub failed: usize,
    /// Existing entries whose tempo or length changed on refresh.
    pub refreshed: usize,
}

/// Appends every unlisted `*.wav` under `root/<genre>/` to `catalog`.
///
/// A missing or unreadable root is an error. Failures on single files are
/// logged, counted and skipped.
pub fn scan_directory(
    root: &Path,
    catalog: &mut Catalog,
    analyzer: &dyn BeatAnalyzer,
) -> CatalogResult<ScanReport> {
    let mut report = ScanReport::default();

    let genre_dirs = list_children(root).map_err(|e| CatalogError::io(root, e))?;
    for dir in genre_dirs.into_iter().filter(|e| e.file_type().is_dir()) {
        let Some(genre) = visible_name(&dir) else {
            continue;
        };
        catalog.ensure_genre(&genre);
        report.genres += 1;

        let files = match list_children(dir.path()) {
            Ok(files) => files,
            Err(e) => {
                warn!(genre = %genre, error = %e, "cannot list genre directory");
                report.failed += 1;
                continue;
            }
        };

        for file in files.iter().filter(|f| f.file_type().is_file() && is_wav(f)) {
            let Some(filename) = visible_name(file) else {
                continue;
            };
            if catalog.contains(&genre, &filename) {
                report.skipped += 1;
                continue;
            }

            let path = absolute(file.path());
            match analyzer.measure(&path) {
                Ok(measured) => {
                    let entry = CatalogEntry {
                        filename,
                        path,
                        bpm: measured.bpm,
                        duration: measured.duration,
                    };
                    match catalog.insert(&genre, entry) {
                        Ok(_) => report.added += 1,
                        Err(e) => {
                            warn!(genre = %genre, error = %e, "rejected scanned beat");
                            report.failed += 1;
                        }
                    }
                }
                Err(e) => {
                    warn!(genre = %genre, error = %e, "failed to measure beat");
                    report.failed += 1;
                }
            }
        }
    }

    info!(
        root = %root.display(),
        genres = report.genres,
        added = report.added,
        skipped = report.skipped,
        failed = report.failed,
        "scan complete"
    );
    Ok(report)
}

/// Scans again, first re-measuring existing entries when `refresh` is set.
///
/// Refreshing corrects tempo and length in place and never removes an entry.
pub fn rescan(
    root: &Path,
    catalog: &mut Catalog,
    analyzer: &dyn BeatAnalyzer,
    refresh: bool,
) -> CatalogResult<ScanReport> {
    let mut refreshed = 0;
    let mut failed = 0;

    if refresh {
        for entry in catalog.entries_mut() {
            match analyzer.measure(&entry.path) {
                Ok(measured) if measured.bpm > 0.0 && measured.bpm.is_finite() => {
                    if measured.bpm != entry.bpm || measured.duration != entry.duration {
                        info!(
                            filename = %entry.filename,
                            old_bpm = entry.bpm,
                            new_bpm = measured.bpm,
                            "corrected catalog tempo"
                        );
                        entry.bpm = measured.bpm;
                        entry.duration = measured.duration;
                        refreshed += 1;
                    }
                }
                Ok(measured) => {
                    warn!(filename = %entry.filename, bpm = measured.bpm, "ignoring invalid tempo");
                    failed += 1;
                }
                Err(e) => {
                    warn!(filename = %entry.filename, error = %e, "failed to re-measure beat");
                    failed += 1;
                }
            }
        }
    }

    let mut report = scan_directory(root, catalog, analyzer)?;
    report.refreshed = refreshed;
    report.failed += failed;
    Ok(report)
}

/// Adds one file by hand with a declared tempo.
///
/// The length is measured when the file decodes and recorded as 0.0 when it
/// does not. Returns `false` when the genre already lists the file name.
pub fn add_manual(
    catalog: &mut Catalog,
    path: &Path,
    genre: &str,
    bpm: f64,
    analyzer: &dyn BeatAnalyzer,
) -> CatalogResult<bool> {
    if !path.is_file() {
        return Err(CatalogError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "beat file not found"),
        ));
    }
    let duration = analyzer.duration(path).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "cannot measure length, recording 0");
        0.0
    });

    let path = absolute(path);
    let filename = file_name(&path).ok_or_else(|| {
        CatalogError::invalid_entry(path.display().to_string(), "path has no file name")
    })?;
    let entry = CatalogEntry {
        filename,
        path,
        bpm,
        duration,
    };
    let added = catalog.insert(genre, entry)?;
    if added {
        info!(genre, bpm, duration, "beat added by hand");
    }
    Ok(added)
}

fn list_children(dir: &Path) -> Result<Vec<DirEntry>, std::io::Error> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .map_err(std::io::Error::from)
}

/// File name, unless it is hidden or a Python cache directory.
fn visible_name(entry: &DirEntry) -> Option<String> {
    let name = entry.file_name().to_str()?;
    if name.starts_with('.') || name == "__pycache__" {
        debug!(path = %entry.path().display(), "skipping hidden entry");
        return None;
    }
    Some(name.to_string())
}

fn is_wav(entry: &DirEntry) -> bool {
    entry
        .path()
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"))
}

fn absolute(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::BeatMeasurement;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;
    use tempfile::TempDir;

    /// Reads the tempo from the file contents, e.g. "104".
    #[derive(Default)]
    struct TextAnalyzer {
        calls: Cell<usize>,
    }

    impl BeatAnalyzer for TextAnalyzer {
        fn measure(&self, path: &Path) -> CatalogResult<BeatMeasurement> {
            self.calls.set(self.calls.get() + 1);
            let text = fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
            let bpm = text.trim().parse::<f64>().map_err(|e| CatalogError::Analysis {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
            Ok(BeatMeasurement { bpm, duration: 30.0 })
        }
    }

    fn beats_tree(files: &[(&str, &str, &str)]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (genre, name, contents) in files {
            let genre_dir = dir.path().join(genre);
            fs::create_dir_all(&genre_dir).unwrap();
            fs::write(genre_dir.join(name), contents).unwrap();
        }
        dir
    }

    #[test]
    fn test_scan_adds_sorted_entries() {
        let dir = beats_tree(&[
            ("pirate-shanty", "b.wav", "104"),
            ("pirate-shanty", "a.wav", "88"),
            ("pirate-shanty", "notes.txt", "hello"),
            ("calm", "c.WAV", "70"),
        ]);
        fs::create_dir(dir.path().join("empty")).unwrap();

        let mut catalog = Catalog::new();
        let report = scan_directory(dir.path(), &mut catalog, &TextAnalyzer::default()).unwrap();

        assert_eq!(
            report,
            ScanReport {
                genres: 3,
                added: 3,
                ..ScanReport::default()
            }
        );
        assert_eq!(catalog.genres().collect::<Vec<_>>(), vec!["calm", "empty", "pirate-shanty"]);
        let names: Vec<_> = catalog
            .entries("pirate-shanty")
            .iter()
            .map(|e| e.filename.as_str())
            .collect();
        assert_eq!(names, vec!["a.wav", "b.wav"]);
        let first = &catalog.entries("pirate-shanty")[0];
        assert!(first.path.is_absolute());
        assert_eq!(first.bpm, 88.0);
        assert_eq!(first.duration, 30.0);
    }

    #[test]
    fn test_hidden_and_cache_dirs_skipped() {
        let dir = beats_tree(&[
            (".git", "x.wav", "100"),
            ("__pycache__", "y.wav", "100"),
            ("pirate-shanty", ".hidden.wav", "100"),
            ("pirate-shanty", "ok.wav", "100"),
        ]);
        fs::write(dir.path().join("loose.wav"), "100").unwrap();

        let mut catalog = Catalog::new();
        let report = scan_directory(dir.path(), &mut catalog, &TextAnalyzer::default()).unwrap();
        assert_eq!(report.genres, 1);
        assert_eq!(report.added, 1);
        assert_eq!(catalog.genres().collect::<Vec<_>>(), vec!["pirate-shanty"]);
    }

    #[test]
    fn test_failures_are_counted_and_skipped() {
        let dir = beats_tree(&[
            ("pirate-shanty", "bad.wav", "not a tempo"),
            ("pirate-shanty", "good.wav", "97"),
            ("pirate-shanty", "zero.wav", "0"),
        ]);
        let mut catalog = Catalog::new();
        let report = scan_directory(dir.path(), &mut catalog, &TextAnalyzer::default()).unwrap();
        assert_eq!(report.added, 1);
        assert_eq!(report.failed, 2);
        assert_eq!(catalog.total_entries(), 1);
    }

    #[test]
    fn test_missing_root_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = Catalog::new();
        let err = scan_directory(&dir.path().join("nope"), &mut catalog, &TextAnalyzer::default())
            .unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[test]
    fn test_second_scan_changes_nothing() {
        let dir = beats_tree(&[("pirate-shanty", "a.wav", "88"), ("pirate-shanty", "b.wav", "104")]);
        let analyzer = TextAnalyzer::default();
        let mut catalog = Catalog::new();
        scan_directory(dir.path(), &mut catalog, &analyzer).unwrap();
        let first = catalog.clone();

        let report = rescan(dir.path(), &mut catalog, &analyzer, false).unwrap();
        assert_eq!(catalog, first);
        assert_eq!(report.added, 0);
        assert_eq!(report.skipped, 2);
        assert_eq!(analyzer.calls.get(), 2);
    }

    #[test]
    fn test_refresh_corrects_tempo_in_place() {
        let dir = beats_tree(&[("pirate-shanty", "a.wav", "88"), ("pirate-shanty", "b.wav", "104")]);
        let analyzer = TextAnalyzer::default();
        let mut catalog = Catalog::new();
        scan_directory(dir.path(), &mut catalog, &analyzer).unwrap();

        fs::write(dir.path().join("pirate-shanty").join("a.wav"), "92").unwrap();
        let report = rescan(dir.path(), &mut catalog, &analyzer, true).unwrap();
        assert_eq!(report.refreshed, 1);
        assert_eq!(report.added, 0);

        let names: Vec<_> = catalog
            .entries("pirate-shanty")
            .iter()
            .map(|e| (e.filename.as_str(), e.bpm))
            .collect();
        assert_eq!(names, vec![("a.wav", 92.0), ("b.wav", 104.0)]);
    }

    #[test]
    fn test_add_manual() {
        let dir = beats_tree(&[("incoming", "new.wav", "not audio")]);
        let path = dir.path().join("incoming").join("new.wav");
        let mut catalog = Catalog::new();

        struct Unreadable;
        impl BeatAnalyzer for Unreadable {
            fn measure(&self, path: &Path) -> CatalogResult<BeatMeasurement> {
                Err(CatalogError::Analysis {
                    path: path.to_path_buf(),
                    message: "undecodable".into(),
                })
            }
        }

        assert!(add_manual(&mut catalog, &path, "sea", 101.0, &Unreadable).unwrap());
        assert!(!add_manual(&mut catalog, &path, "sea", 101.0, &Unreadable).unwrap());
        let entry = &catalog.entries("sea")[0];
        assert_eq!(entry.filename, "new.wav");
        assert_eq!(entry.duration, 0.0);
        assert_eq!(entry.bpm, 101.0);

        assert!(add_manual(&mut catalog, &path, "sea", -5.0, &Unreadable).is_err());
        assert!(add_manual(&mut catalog, &dir.path().join("missing.wav"), "sea", 100.0, &Unreadable).is_err());
    }
}
