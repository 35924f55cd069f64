//! # automem-ledger
//!
//! Durable line-oriented stores for the automem engine:
//!
//! - [`store`] — the Change Ledger: pending file-change records with optional
//!   causal context, recorded by the post-edit hook and drained by a
//!   synchronization pass.
//! - [`command_log`] — successful shell commands, the evidence base for
//!   stale-command detection.

pub mod command_log;
pub mod error;
pub mod store;

pub use error::LedgerError;
pub use store::{LedgerStatus, LedgerView};
