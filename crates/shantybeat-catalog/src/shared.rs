//! A catalog shared between pipeline threads.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard};

use tracing::debug;

use crate::analyzer::BeatAnalyzer;
use crate::catalog::Catalog;
use crate::entry::CatalogEntry;
use crate::error::CatalogResult;
use crate::scan::{add_manual, rescan, ScanReport};

/// Cloneable handle to one catalog behind a reader/writer lock.
///
/// Matching takes a read lock. Writers work on a private copy and swap it in
/// when done, so readers see either the old catalog or the new one. Writers
/// hold the writer lock from copy to swap and never interleave.
#[derive(Debug, Clone, Default)]
pub struct SharedCatalog {
    inner: Arc<RwLock<Catalog>>,
    writer: Arc<Mutex<()>>,
}

impl SharedCatalog {
    /// Wraps `catalog`.
    pub fn new(catalog: Catalog) -> Self {
        Self {
            inner: Arc::new(RwLock::new(catalog)),
            writer: Arc::new(Mutex::new(())),
        }
    }

    /// Loads the document at `path`.
    pub fn load(path: &Path) -> CatalogResult<Self> {
        Catalog::load(path).map(Self::new)
    }

    /// Read access for the duration of the guard.
    pub fn read(&self) -> RwLockReadGuard<'_, Catalog> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current catalog.
    pub fn snapshot(&self) -> Catalog {
        self.read().clone()
    }

    /// Replaces the catalog wholesale.
    pub fn replace(&self, catalog: Catalog) {
        let _writer = self.lock_writer();
        self.install(catalog);
    }

    fn lock_writer(&self) -> MutexGuard<'_, ()> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn install(&self, catalog: Catalog) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = catalog;
    }

    /// Closest entry to `target_bpm`, cloned out of the lock.
    pub fn find_closest(&self, target_bpm: f64, genre: &str, tolerance: f64) -> Option<CatalogEntry> {
        self.read().find_closest(target_bpm, genre, tolerance).cloned()
    }

    /// Scans `root` into a copy of the catalog and installs the result.
    ///
    /// On error the shared catalog is left untouched.
    pub fn rescan(
        &self,
        root: &Path,
        analyzer: &dyn BeatAnalyzer,
        refresh: bool,
    ) -> CatalogResult<ScanReport> {
        let _writer = self.lock_writer();
        let mut next = self.snapshot();
        let report = rescan(root, &mut next, analyzer, refresh)?;
        self.install(next);
        debug!(added = report.added, refreshed = report.refreshed, "shared catalog swapped");
        Ok(report)
    }

    /// Adds a file by hand; see [`add_manual`].
    pub fn add_manual(
        &self,
        path: &Path,
        genre: &str,
        bpm: f64,
        analyzer: &dyn BeatAnalyzer,
    ) -> CatalogResult<bool> {
        let _writer = self.lock_writer();
        let mut next = self.snapshot();
        let added = add_manual(&mut next, path, genre, bpm, analyzer)?;
        if added {
            self.install(next);
        }
        Ok(added)
    }

    /// Writes the current catalog to `path`.
    pub fn save(&self, path: &Path) -> CatalogResult<()> {
        let snapshot = self.snapshot();
        snapshot.save(path)
    }
}
