//! Error types for automem-trigger.

use std::path::PathBuf;

use thiserror::Error;

use automem_ledger::LedgerError;

/// All errors that can arise from boundary handling and contract plumbing.
#[derive(Debug, Error)]
pub enum TriggerError {
    /// An error from the change ledger.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Contract JSON serialization/deserialization error.
    #[error("contract JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience constructor for [`TriggerError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> TriggerError {
    TriggerError::Io {
        path: path.into(),
        source,
    }
}
