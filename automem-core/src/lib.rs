//! Automem core library — domain types, persisted configuration, errors.
//!
//! Public API surface:
//! - [`types`] — newtypes, enums, and domain structs
//! - [`config`] — per-project YAML configuration with fail-open defaults
//! - [`paths`] — control-directory path helpers
//! - [`error`] — [`ConfigError`]

pub mod config;
pub mod error;
pub mod paths;
pub mod types;

pub use config::Config;
pub use error::ConfigError;
pub use types::{
    ChangeRecord, DocumentedFact, FactSource, Ownership, PassLimits, SectionName, TriggerMode,
};
