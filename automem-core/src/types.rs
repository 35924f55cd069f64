//! Domain types for the automem engine.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.
//! Everything persisted is serializable/deserializable via serde.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed name for a document section (e.g. `"architecture"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SectionName(pub String);

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for SectionName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SectionName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// When a batch boundary may start a synchronization pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TriggerMode {
    /// Every non-empty edit batch triggers a pass.
    #[default]
    Default,
    /// Only batches containing a version-control commit trigger a pass.
    CommitOnly,
}

impl fmt::Display for TriggerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerMode::Default => write!(f, "default"),
            TriggerMode::CommitOnly => write!(f, "commit-only"),
        }
    }
}

impl FromStr for TriggerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(TriggerMode::Default),
            "commit-only" => Ok(TriggerMode::CommitOnly),
            other => Err(format!(
                "unknown trigger mode '{other}'; expected: default, commit-only"
            )),
        }
    }
}

/// Who may rewrite a document region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Ownership {
    /// Bounded by a named marker pair; the engine may rewrite it.
    MachineOwned,
    /// Bounded by the manual marker pair; the engine must never touch it.
    HumanOwned,
}

/// Where a documented fact came from, which decides the evidence needed to
/// remove it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactSource {
    /// Explicitly decided by a human; removal needs a whole-repository search.
    Convention,
    /// Inferred from recurring structure; removable on a change-local search.
    Pattern,
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// One pending file change in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// Absolute path to the changed file.
    pub path: PathBuf,
    /// Optional causal annotation, e.g. `"a1b2c3d: fix login bug"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl ChangeRecord {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            context: None,
        }
    }

    pub fn with_context(path: impl Into<PathBuf>, context: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            context: Some(context.into()),
        }
    }

    /// Whether the context annotation is commit-shaped: a lowercase hex hash
    /// of 7–40 characters followed by `": "` and a message.
    pub fn has_commit_context(&self) -> bool {
        let Some(context) = self.context.as_deref() else {
            return false;
        };
        let Some((hash, message)) = context.split_once(": ") else {
            return false;
        };
        (7..=40).contains(&hash.len())
            && hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
            && !message.trim().is_empty()
    }
}

/// An atomic claim currently written inside a machine-owned section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentedFact {
    /// The distinguishing text of the claim, used verbatim for searches.
    pub text: String,
    pub source: FactSource,
}

impl DocumentedFact {
    pub fn new(text: impl Into<String>, source: FactSource) -> Self {
        Self {
            text: text.into(),
            source,
        }
    }
}

/// Bounds applied to a synchronization pass. Policy knobs, not correctness
/// requirements; all persisted in the project config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassLimits {
    /// Maximum distinct files named in a trigger directive.
    #[serde(default = "default_directive_max_files")]
    pub directive_max_files: usize,
    /// Maximum changed files handed to the worker in one pass.
    #[serde(default = "default_max_files")]
    pub max_files: usize,
    /// Maximum nearby dependency files gathered per changed file.
    #[serde(default = "default_max_deps_per_file")]
    pub max_deps_per_file: usize,
}

fn default_directive_max_files() -> usize {
    20
}
fn default_max_files() -> usize {
    7
}
fn default_max_deps_per_file() -> usize {
    5
}

impl Default for PassLimits {
    fn default() -> Self {
        Self {
            directive_max_files: default_directive_max_files(),
            max_files: default_max_files(),
            max_deps_per_file: default_max_deps_per_file(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
