//! Error types for the beat catalog.

use std::path::PathBuf;

use shantybeat_audio::AudioError;
use shantybeat_spec::BackendError;
use thiserror::Error;

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors raised while loading, saving or scanning a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Reading the catalog file or walking the beats directory failed.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The catalog document is not valid JSON of the expected shape.
    #[error("failed to parse catalog '{}': {source}", path.display())]
    Parse {
        /// Catalog file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// The catalog could not be serialized.
    #[error("failed to serialize catalog: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A beat file could not be measured.
    #[error("failed to analyze '{}': {message}", path.display())]
    Analysis {
        /// Beat file.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// An entry failed validation before insertion.
    #[error("invalid entry '{filename}': {message}")]
    InvalidEntry {
        /// Entry file name.
        filename: String,
        /// What is wrong with it.
        message: String,
    },

    /// Audio backend failure, usually from an atomic write.
    #[error(transparent)]
    Audio(#[from] AudioError),
}

impl CatalogError {
    /// Creates an [`CatalogError::Io`] error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CatalogError::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an [`CatalogError::InvalidEntry`] error.
    pub fn invalid_entry(filename: impl Into<String>, message: impl Into<String>) -> Self {
        CatalogError::InvalidEntry {
            filename: filename.into(),
            message: message.into(),
        }
    }
}

impl BackendError for CatalogError {
    fn code(&self) -> &'static str {
        match self {
            CatalogError::Io { .. } => "CATALOG_001",
            CatalogError::Parse { .. } => "CATALOG_002",
            CatalogError::Serialize(_) => "CATALOG_003",
            CatalogError::Analysis { .. } => "CATALOG_004",
            CatalogError::InvalidEntry { .. } => "CATALOG_005",
            CatalogError::Audio(inner) => inner.code(),
        }
    }

    fn category(&self) -> &'static str {
        match self {
            CatalogError::Audio(_) => "audio",
            _ => "catalog",
        }
    }
}
