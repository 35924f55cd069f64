//! Error types for automem-ledger.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from ledger operations.
///
/// An unreadable ledger is deliberately *not* represented here: corruption
/// fails open to an empty view with the anomaly carried on
/// [`crate::LedgerView`], per the no-worse-than-before policy.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A rejected write: empty, relative, self-referential, or targeting a
    /// machine-owned document. Callers log and no-op.
    #[error("invalid ledger path {path}: {reason}")]
    InvalidPath { path: PathBuf, reason: &'static str },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`LedgerError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> LedgerError {
    LedgerError::Io {
        path: path.into(),
        source,
    }
}
