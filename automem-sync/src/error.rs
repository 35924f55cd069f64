//! Error types for automem-sync.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from document-side operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A section has an unmatched or misnamed marker pair. The section is
    /// skipped, never repaired in place.
    #[error("marker mismatch in section '{section}' near line {line}")]
    MarkerMismatch { section: String, line: usize },

    /// The named machine-owned section does not exist in the document.
    #[error("no machine-owned section named '{section}'")]
    SectionNotFound { section: String },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
