//! # automem-sync
//!
//! Document-side machinery for the synchronization pass:
//!
//! - [`sections`] — marker-delimited document regions with ownership tags,
//!   byte-preserving section replacement, hash-gated atomic writes, and
//!   governing-document resolution.
//! - [`categorize`] — the static path→section rule table.
//! - [`verify`] — removal verification and stale-command detection behind
//!   swappable collaborator traits.
//! - [`diff`] — unified diffs of proposed section rewrites.

pub mod categorize;
pub mod diff;
pub mod error;
pub mod sections;
pub mod verify;

pub use error::SyncError;
pub use sections::{Document, WriteResult};
pub use verify::{CommandVerdict, RemovalVerdict};
