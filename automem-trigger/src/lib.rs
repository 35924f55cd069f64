//! # automem-trigger
//!
//! Batch-boundary handling for the automem engine:
//!
//! - [`coordinator`] — the Idle/Triggered state machine deciding when a
//!   synchronization pass starts, guarded against re-entrant triggering.
//! - [`state`] — the persisted authoritative copy of the trigger flag.
//! - [`contract`] — the JSON handoff to the isolated worker that performs
//!   the documentation update, and the application of its reported outcome
//!   back onto the ledger.

pub mod contract;
pub mod coordinator;
pub mod error;
pub mod state;

pub use contract::{RequestFile, SectionEdit, SyncOutcome, SyncRequest, SyncStatus};
pub use coordinator::{decide, observe_boundary_at, BoundaryDecision, SyncDirective};
pub use error::TriggerError;
