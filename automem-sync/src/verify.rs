//! Removal verification and stale-command detection.
//!
//! Both checks run before a machine-owned section loses content. The
//! collaborators are trait seams so tests can swap them; the bundled
//! implementations walk the repository tree ([`FsSearch`]) and read the
//! successful-command log ([`LogCommandHistory`]).
//!
//! The failure default is always "keep the documented fact": an unreachable
//! collaborator yields `Keep` / `NoEvidence`, never a removal.

use std::path::{Path, PathBuf};

use thiserror::Error;

use automem_core::types::{DocumentedFact, FactSource};
use automem_ledger::command_log;

use crate::categorize::ARTIFACT_COMPONENTS;

/// The repository-search or command-history collaborator could not run.
#[derive(Debug, Error)]
#[error("verification unavailable: {detail}")]
pub struct SearchUnavailable {
    pub detail: String,
}

// ---------------------------------------------------------------------------
// Collaborator seams
// ---------------------------------------------------------------------------

/// Where a removal-verification search must look.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchScope {
    /// The entire repository.
    Repository,
    /// Only the named directories (change-local search).
    Directories(Vec<PathBuf>),
}

/// Repository search collaborator: where does a text fragment still occur?
pub trait RepoSearch {
    fn occurrences(
        &self,
        fragment: &str,
        scope: &SearchScope,
    ) -> Result<Vec<PathBuf>, SearchUnavailable>;
}

/// Command-history collaborator: which commands are known to have succeeded?
pub trait CommandHistory {
    fn successful_commands(&self) -> Result<Vec<String>, SearchUnavailable>;
}

// ---------------------------------------------------------------------------
// Verdicts
// ---------------------------------------------------------------------------

/// Why a fact stays documented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeepReason {
    /// The fragment still occurs somewhere in scope — it migrated, not
    /// disappeared.
    StillPresent { path: PathBuf },
    /// The search could not run; uncertainty never removes.
    VerificationUnavailable { detail: String },
}

/// Outcome of removal verification for one documented fact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalVerdict {
    Remove,
    Keep { reason: KeepReason },
}

/// Outcome of reviewing one documented command against the evidence base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandVerdict {
    /// The command appears verbatim among successful executions.
    Confirmed,
    /// A textually related command succeeded instead; the documentation
    /// should say that one.
    Replace { with: String },
    /// No related command found — absence of evidence is not staleness.
    NoEvidence,
}

// ---------------------------------------------------------------------------
// Removal verification
// ---------------------------------------------------------------------------

/// Decide whether a fact that disappeared from the changed files may be
/// removed from the documentation.
///
/// A `pattern` fact is removable on a clean change-local search; a
/// `convention` fact is human intent and requires a clean search of the
/// entire repository.
pub fn verify_removal(
    fact: &DocumentedFact,
    changed_dirs: &[PathBuf],
    search: &dyn RepoSearch,
) -> RemovalVerdict {
    let scope = match fact.source {
        FactSource::Convention => SearchScope::Repository,
        FactSource::Pattern => SearchScope::Directories(changed_dirs.to_vec()),
    };
    match search.occurrences(&fact.text, &scope) {
        Ok(hits) => match hits.into_iter().next() {
            None => RemovalVerdict::Remove,
            Some(path) => RemovalVerdict::Keep {
                reason: KeepReason::StillPresent { path },
            },
        },
        Err(err) => {
            tracing::warn!("removal verification skipped for '{}': {err}", fact.text);
            RemovalVerdict::Keep {
                reason: KeepReason::VerificationUnavailable {
                    detail: err.detail,
                },
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Stale-command detection
// ---------------------------------------------------------------------------

/// Compare a documented command against the successful-execution set.
pub fn review_command(documented: &str, history: &dyn CommandHistory) -> CommandVerdict {
    let commands = match history.successful_commands() {
        Ok(commands) => commands,
        Err(err) => {
            tracing::warn!("command history unavailable: {err}");
            return CommandVerdict::NoEvidence;
        }
    };

    let documented = documented.trim();
    if commands.iter().any(|c| c.trim() == documented) {
        return CommandVerdict::Confirmed;
    }

    // Related = a successful command that mentions the documented command's
    // leading tool name as a whole token (`pytest tests/` → `uv run pytest`).
    let Some(tool) = documented.split_whitespace().next() else {
        return CommandVerdict::NoEvidence;
    };
    for command in &commands {
        if command.split_whitespace().any(|token| token == tool) {
            return CommandVerdict::Replace {
                with: command.clone(),
            };
        }
    }
    CommandVerdict::NoEvidence
}

// ---------------------------------------------------------------------------
// Bundled collaborators
// ---------------------------------------------------------------------------

/// Filesystem-walking repository search.
///
/// Skips vendored/build/VCS directories and the engine's own control
/// directory; files that are not valid UTF-8 are skipped, not errors.
pub struct FsSearch {
    root: PathBuf,
    excluded: Vec<String>,
}

impl FsSearch {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let mut excluded: Vec<String> = ARTIFACT_COMPONENTS
            .iter()
            .map(|s| s.to_string())
            .collect();
        excluded.push(automem_core::paths::CONTROL_DIR.to_string());
        Self {
            root: root.into(),
            excluded,
        }
    }

    /// Add a directory name to the exclusion set.
    pub fn exclude(mut self, dir_name: impl Into<String>) -> Self {
        self.excluded.push(dir_name.into());
        self
    }

    fn walk(
        &self,
        dir: &Path,
        fragment: &str,
        hits: &mut Vec<PathBuf>,
    ) -> Result<(), SearchUnavailable> {
        let entries = std::fs::read_dir(dir).map_err(|e| SearchUnavailable {
            detail: format!("cannot read {}: {e}", dir.display()),
        })?;
        let mut entries: Vec<_> = entries.filter_map(|e| e.ok()).collect();
        entries.sort_by_key(|e| e.file_name());

        for entry in entries {
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            let file_type = match entry.file_type() {
                Ok(t) => t,
                Err(_) => continue,
            };
            if file_type.is_dir() {
                if self.excluded.iter().any(|ex| ex == &name) {
                    continue;
                }
                self.walk(&path, fragment, hits)?;
            } else if file_type.is_file() {
                if let Ok(content) = std::fs::read_to_string(&path) {
                    if content.contains(fragment) {
                        hits.push(path);
                    }
                }
            }
        }
        Ok(())
    }
}

impl RepoSearch for FsSearch {
    fn occurrences(
        &self,
        fragment: &str,
        scope: &SearchScope,
    ) -> Result<Vec<PathBuf>, SearchUnavailable> {
        let dirs: Vec<PathBuf> = match scope {
            SearchScope::Repository => vec![self.root.clone()],
            SearchScope::Directories(dirs) => dirs.clone(),
        };
        let mut hits = Vec::new();
        for dir in dirs {
            if !dir.exists() {
                continue;
            }
            self.walk(&dir, fragment, &mut hits)?;
        }
        Ok(hits)
    }
}

/// Command history backed by the successful-command log.
pub struct LogCommandHistory {
    root: PathBuf,
    limit: usize,
}

impl LogCommandHistory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            limit: 200,
        }
    }
}

impl CommandHistory for LogCommandHistory {
    fn successful_commands(&self) -> Result<Vec<String>, SearchUnavailable> {
        Ok(command_log::recent_commands_at(&self.root, self.limit))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
