//! The orchestration contract — the handoff between the coordinator and the
//! isolated worker that performs the documentation update.
//!
//! Message passing only: a [`SyncRequest`] value goes out, a [`SyncOutcome`]
//! value comes back, no shared mutable state. The worker itself (prose
//! generation, section rewriting) is an external collaborator; this module
//! owns the request shape, the outcome shape, and the application of an
//! outcome back onto the ledger.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use automem_core::config::Config;
use automem_core::paths::control_dir_at;
use automem_core::types::{PassLimits, SectionName};
use automem_ledger::store;
use automem_sync::{categorize, sections};

use crate::coordinator::SyncDirective;
use crate::error::{io_err, TriggerError};

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// One changed file as handed to the worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestFile {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Nearby dependency files, capped at `limits.max_deps_per_file`.
    #[serde(default)]
    pub dependencies: Vec<PathBuf>,
    /// Document sections this path maps onto.
    #[serde(default)]
    pub sections: Vec<SectionName>,
}

/// Everything the isolated worker needs for one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncRequest {
    pub files: Vec<RequestFile>,
    /// Documents whose ownership hierarchy covers the changed paths;
    /// nearest first, root document always last.
    pub documents: Vec<PathBuf>,
    pub limits: PassLimits,
}

/// Build the worker request for a directive.
///
/// Applies the pass bounds from config: at most `max_files` changed files,
/// at most `max_deps_per_file` sibling dependencies each. Dependency
/// gathering is best-effort — a vanished directory contributes nothing.
pub fn build_request_at(
    root: &Path,
    directive: &SyncDirective,
    cfg: &Config,
) -> SyncRequest {
    let limits = cfg.limits;
    let files: Vec<RequestFile> = directive
        .files
        .iter()
        .take(limits.max_files)
        .map(|record| RequestFile {
            path: record.path.clone(),
            context: record.context.clone(),
            dependencies: sibling_dependencies(&record.path, limits.max_deps_per_file),
            sections: categorize::categorize_with_root(root, &record.path)
                .into_iter()
                .collect(),
        })
        .collect();

    let changed: Vec<PathBuf> = files.iter().map(|f| f.path.clone()).collect();
    let documents = sections::governing_documents_at(root, &changed, &cfg.memory_file);

    SyncRequest {
        files,
        documents,
        limits,
    }
}

/// Sibling source files sharing the changed file's extension — the cheap
/// approximation of "nearby dependencies".
fn sibling_dependencies(path: &Path, cap: usize) -> Vec<PathBuf> {
    let (Some(dir), Some(extension)) = (path.parent(), path.extension()) else {
        return Vec::new();
    };
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut siblings: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p != path && p.is_file() && p.extension() == Some(extension))
        .collect();
    siblings.sort();
    siblings.truncate(cap);
    siblings
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// A section the worker reports having modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionEdit {
    pub document: PathBuf,
    pub section: SectionName,
}

/// Worker-reported result of a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncStatus {
    /// Every requested path was processed.
    Complete,
    /// Some paths were processed, the rest stay pending.
    Partial { processed: Vec<PathBuf> },
    /// Nothing was processed; the ledger is retained in full.
    Failed,
}

/// The value the isolated worker returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOutcome {
    #[serde(flatten)]
    pub status: SyncStatus,
    #[serde(default)]
    pub modified: Vec<SectionEdit>,
    /// Human-readable summary of what the pass did.
    #[serde(default)]
    pub summary: String,
}

/// What applying an outcome did to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedOutcome {
    pub drained: usize,
    pub remaining: usize,
}

/// Apply a worker outcome to the ledger.
///
/// Total failure retains every record; partial success removes exactly the
/// processed subset; completion drains the ledger. The trigger flag is not
/// touched here — the next boundary resets it regardless of outcome.
pub fn apply_outcome_at(root: &Path, outcome: &SyncOutcome) -> Result<AppliedOutcome, TriggerError> {
    let applied = match &outcome.status {
        SyncStatus::Failed => {
            let status = store::peek_at(root)?;
            AppliedOutcome {
                drained: 0,
                remaining: status.pending,
            }
        }
        SyncStatus::Partial { processed } => {
            let before = store::peek_at(root)?.pending;
            let remaining = store::retain_pending_at(root, processed)?;
            AppliedOutcome {
                drained: before.saturating_sub(remaining),
                remaining,
            }
        }
        SyncStatus::Complete => {
            let view = store::drain_at(root)?;
            AppliedOutcome {
                drained: view.records.len(),
                remaining: 0,
            }
        }
    };

    record_pass_at(root, outcome)?;
    Ok(applied)
}

// ---------------------------------------------------------------------------
// Pass record
// ---------------------------------------------------------------------------

/// Persisted note about the most recent pass, for status reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassRecord {
    pub finished_at: DateTime<Utc>,
    pub outcome: SyncOutcome,
}

/// `<root>/.automem/last-pass.json` — pure, no I/O.
pub fn pass_record_path_at(root: &Path) -> PathBuf {
    control_dir_at(root).join("last-pass.json")
}

fn record_pass_at(root: &Path, outcome: &SyncOutcome) -> Result<(), TriggerError> {
    let record = PassRecord {
        finished_at: Utc::now(),
        outcome: outcome.clone(),
    };
    let path = pass_record_path_at(root);
    let Some(dir) = path.parent() else {
        return Err(io_err(path, std::io::Error::other("invalid pass path")));
    };
    std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;

    let json = serde_json::to_string_pretty(&record)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json).map_err(|e| io_err(&tmp, e))?;
    std::fs::rename(&tmp, &path).map_err(|e| io_err(&path, e))?;
    Ok(())
}

/// Load the most recent pass record, if any. Unreadable records read as
/// absent — status reporting must not fail over bookkeeping.
pub fn load_pass_record_at(root: &Path) -> Option<PassRecord> {
    let path = pass_record_path_at(root);
    let contents = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&contents).ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use automem_core::types::ChangeRecord;
    use tempfile::TempDir;

    use super::*;

    const MEMORY_FILE: &str = "CLAUDE.md";

    fn record(root: &Path, path: &Path, context: Option<&str>) {
        store::record_at(root, path, context, MEMORY_FILE).expect("record");
    }

    fn directive_for(records: &[ChangeRecord]) -> SyncDirective {
        SyncDirective {
            files: records.to_vec(),
            truncated: 0,
        }
    }

    #[test]
    fn request_carries_context_sections_and_documents() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        std::fs::create_dir_all(root.join("src")).unwrap();
        std::fs::write(root.join("src/auth.py"), "x").unwrap();
        std::fs::write(root.join("src/login.py"), "x").unwrap();

        let records = vec![ChangeRecord::with_context(
            root.join("src/auth.py"),
            "a1b2c3d: fix bug",
        )];
        let request = build_request_at(root, &directive_for(&records), &Config::default());

        assert_eq!(request.files.len(), 1);
        let file = &request.files[0];
        assert_eq!(file.context.as_deref(), Some("a1b2c3d: fix bug"));
        assert_eq!(file.dependencies, vec![root.join("src/login.py")]);
        assert!(file
            .sections
            .contains(&SectionName::from(categorize::ARCHITECTURE)));
        assert_eq!(request.documents, vec![root.join(MEMORY_FILE)]);
    }

    #[test]
    fn request_enforces_both_caps() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        std::fs::create_dir_all(root.join("src")).unwrap();
        for i in 0..12 {
            std::fs::write(root.join(format!("src/mod{i:02}.py")), "x").unwrap();
        }

        let records: Vec<ChangeRecord> = (0..12)
            .map(|i| ChangeRecord::new(root.join(format!("src/mod{i:02}.py"))))
            .collect();
        let cfg = Config::default();
        let request = build_request_at(root, &directive_for(&records), &cfg);

        assert_eq!(request.files.len(), cfg.limits.max_files);
        for file in &request.files {
            assert!(file.dependencies.len() <= cfg.limits.max_deps_per_file);
            assert!(!file.dependencies.contains(&file.path));
        }
    }

    #[test]
    fn vanished_file_contributes_no_dependencies() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        let records = vec![ChangeRecord::new(root.join("gone/file.py"))];
        let request = build_request_at(root, &directive_for(&records), &Config::default());
        assert!(request.files[0].dependencies.is_empty());
    }

    #[test]
    fn failed_outcome_retains_full_ledger() {
        let tmp = TempDir::new().unwrap();
        record(tmp.path(), Path::new("/repo/a.py"), None);
        record(tmp.path(), Path::new("/repo/b.py"), None);

        let outcome = SyncOutcome {
            status: SyncStatus::Failed,
            modified: vec![],
            summary: "worker crashed".to_string(),
        };
        let applied = apply_outcome_at(tmp.path(), &outcome).expect("apply");
        assert_eq!(applied, AppliedOutcome { drained: 0, remaining: 2 });
        assert_eq!(store::peek_at(tmp.path()).unwrap().pending, 2);
    }

    #[test]
    fn partial_outcome_removes_only_processed_paths() {
        let tmp = TempDir::new().unwrap();
        record(tmp.path(), Path::new("/repo/a.py"), None);
        record(tmp.path(), Path::new("/repo/b.py"), Some("a1b2c3d: m"));
        record(tmp.path(), Path::new("/repo/c.py"), None);

        let outcome = SyncOutcome {
            status: SyncStatus::Partial {
                processed: vec![PathBuf::from("/repo/a.py"), PathBuf::from("/repo/c.py")],
            },
            modified: vec![],
            summary: "two of three".to_string(),
        };
        let applied = apply_outcome_at(tmp.path(), &outcome).expect("apply");
        assert_eq!(applied, AppliedOutcome { drained: 2, remaining: 1 });

        let view = store::load_at(tmp.path()).unwrap();
        assert_eq!(view.records.len(), 1);
        assert_eq!(view.records[0].path, PathBuf::from("/repo/b.py"));
        assert_eq!(view.records[0].context.as_deref(), Some("a1b2c3d: m"));
    }

    #[test]
    fn complete_outcome_drains_everything() {
        let tmp = TempDir::new().unwrap();
        record(tmp.path(), Path::new("/repo/a.py"), None);

        let outcome = SyncOutcome {
            status: SyncStatus::Complete,
            modified: vec![SectionEdit {
                document: PathBuf::from("/repo/CLAUDE.md"),
                section: SectionName::from("architecture"),
            }],
            summary: "updated architecture".to_string(),
        };
        let applied = apply_outcome_at(tmp.path(), &outcome).expect("apply");
        assert_eq!(applied, AppliedOutcome { drained: 1, remaining: 0 });
        assert!(store::peek_at(tmp.path()).unwrap().is_empty);

        let pass = load_pass_record_at(tmp.path()).expect("pass record");
        assert_eq!(pass.outcome, outcome);
    }

    #[test]
    fn outcome_json_roundtrip_with_status_tag() {
        let outcome = SyncOutcome {
            status: SyncStatus::Partial {
                processed: vec![PathBuf::from("/repo/a.py")],
            },
            modified: vec![],
            summary: "s".to_string(),
        };
        let json = serde_json::to_string(&outcome).expect("serialize");
        assert!(json.contains("\"status\":\"partial\""));
        let back: SyncOutcome = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, outcome);
    }

    #[test]
    fn request_json_omits_absent_context() {
        let request = SyncRequest {
            files: vec![RequestFile {
                path: PathBuf::from("/repo/a.py"),
                context: None,
                dependencies: vec![],
                sections: vec![],
            }],
            documents: vec![PathBuf::from("/repo/CLAUDE.md")],
            limits: PassLimits::default(),
        };
        let json = serde_json::to_string(&request).expect("serialize");
        assert!(!json.contains("context"));
    }
}
