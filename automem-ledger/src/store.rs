//! The Change Ledger — a durable queue of pending file changes.
//!
//! On-disk format at `<root>/.automem/pending-changes`, one record per line:
//!
//! ```text
//! /repo/src/auth.py
//! /repo/src/login.py [a1b2c3d: fix login bug]
//! ```
//!
//! Recording is append-only so the hot path never rewrites the file;
//! duplicate lines on disk are legal. The merge invariant is applied at
//! parse time: a path's position is fixed at its first insertion, and the
//! first non-empty context supplied for a path wins — later context never
//! overwrites it, and a context-free write never clears it.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use automem_core::paths::{control_dir_at, is_within_control_dir};
use automem_core::types::ChangeRecord;

use crate::error::{io_err, LedgerError};

/// `<root>/.automem/pending-changes` — pure, no I/O.
pub fn ledger_path_at(root: &Path) -> PathBuf {
    control_dir_at(root).join("pending-changes")
}

/// Where unreadable ledger content is preserved — pure, no I/O.
pub fn corrupt_path_at(root: &Path) -> PathBuf {
    control_dir_at(root).join("pending-changes.corrupt")
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// Parsed, merged view of the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LedgerView {
    /// Deduplicated records in first-insertion order.
    pub records: Vec<ChangeRecord>,
    /// Set when the on-disk ledger could not be read; surfaced in the next
    /// summary instead of failing the pass.
    pub anomaly: Option<String>,
}

/// Read-only ledger status for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerStatus {
    pub pending: usize,
    pub is_empty: bool,
    pub anomaly: Option<String>,
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// Append one change record. O(1): open for append, write one line.
///
/// Rejects with [`LedgerError::InvalidPath`] when `path` is empty, relative,
/// inside the control directory, or names the memory document itself — the
/// engine must never track its own output.
pub fn record_at(
    root: &Path,
    path: &Path,
    context: Option<&str>,
    memory_file: &str,
) -> Result<(), LedgerError> {
    validate(path, memory_file)?;
    append_lines(root, &[format_line(path, context)])
}

/// Append several records in a single open/append. Invalid paths are
/// skipped (logged at debug level); valid ones are still recorded.
///
/// Returns the number of records written.
pub fn record_many_at(
    root: &Path,
    paths: &[PathBuf],
    context: Option<&str>,
    memory_file: &str,
) -> Result<usize, LedgerError> {
    let mut lines = Vec::with_capacity(paths.len());
    for path in paths {
        match validate(path, memory_file) {
            Ok(()) => lines.push(format_line(path, context)),
            Err(err) => tracing::debug!("skipping ledger record: {err}"),
        }
    }
    if lines.is_empty() {
        return Ok(0);
    }
    append_lines(root, &lines)?;
    Ok(lines.len())
}

fn validate(path: &Path, memory_file: &str) -> Result<(), LedgerError> {
    if path.as_os_str().is_empty() {
        return Err(LedgerError::InvalidPath {
            path: path.to_path_buf(),
            reason: "empty path",
        });
    }
    if !path.is_absolute() {
        return Err(LedgerError::InvalidPath {
            path: path.to_path_buf(),
            reason: "path must be absolute",
        });
    }
    if is_within_control_dir(path) {
        return Err(LedgerError::InvalidPath {
            path: path.to_path_buf(),
            reason: "path is inside the control directory",
        });
    }
    if path.file_name().is_some_and(|name| name == memory_file) {
        return Err(LedgerError::InvalidPath {
            path: path.to_path_buf(),
            reason: "path targets a machine-owned document",
        });
    }
    Ok(())
}

fn format_line(path: &Path, context: Option<&str>) -> String {
    match context {
        Some(ctx) if !ctx.trim().is_empty() => format!("{} [{}]", path.display(), ctx.trim()),
        _ => path.display().to_string(),
    }
}

fn append_lines(root: &Path, lines: &[String]) -> Result<(), LedgerError> {
    let path = ledger_path_at(root);
    let Some(dir) = path.parent() else {
        return Err(io_err(path, std::io::Error::other("invalid ledger path")));
    };
    std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| io_err(&path, e))?;
    for line in lines {
        writeln!(file, "{line}").map_err(|e| io_err(&path, e))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Load / peek
// ---------------------------------------------------------------------------

enum RawLedger {
    Absent,
    Text(String),
    Corrupt(String),
}

fn read_raw(root: &Path) -> Result<RawLedger, LedgerError> {
    let path = ledger_path_at(root);
    let bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(RawLedger::Absent),
        Err(err) => return Err(io_err(&path, err)),
    };
    match String::from_utf8(bytes) {
        Ok(text) => Ok(RawLedger::Text(text)),
        Err(_) => Ok(RawLedger::Corrupt(format!(
            "ledger at {} is not valid UTF-8; treated as empty",
            path.display()
        ))),
    }
}

fn parse(text: &str) -> Vec<ChangeRecord> {
    let mut records: Vec<ChangeRecord> = Vec::new();
    let mut index: HashMap<PathBuf, usize> = HashMap::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (path, context) = split_line(line);
        match index.get(&path) {
            Some(&i) => {
                // Merge: first non-empty context wins, position stays fixed.
                if records[i].context.is_none() {
                    records[i].context = context;
                }
            }
            None => {
                index.insert(path.clone(), records.len());
                records.push(ChangeRecord { path, context });
            }
        }
    }
    records
}

fn split_line(line: &str) -> (PathBuf, Option<String>) {
    // `path [context]` — context is everything between the first ` [` and
    // the trailing `]`. Paths themselves never contain ` [`.
    if line.ends_with(']') {
        if let Some((path, rest)) = line.split_once(" [") {
            let context = rest[..rest.len() - 1].trim();
            let context = (!context.is_empty()).then(|| context.to_string());
            return (PathBuf::from(path), context);
        }
    }
    (PathBuf::from(line), None)
}

/// Load the merged ledger view without mutating it.
///
/// An unreadable ledger yields an empty view with `anomaly` set; the bytes
/// on disk are left exactly as they are.
pub fn load_at(root: &Path) -> Result<LedgerView, LedgerError> {
    match read_raw(root)? {
        RawLedger::Absent => Ok(LedgerView::default()),
        RawLedger::Text(text) => Ok(LedgerView {
            records: parse(&text),
            anomaly: None,
        }),
        RawLedger::Corrupt(anomaly) => {
            tracing::warn!("{anomaly}");
            Ok(LedgerView {
                records: Vec::new(),
                anomaly: Some(anomaly),
            })
        }
    }
}

/// Read-only status: count and emptiness. Never mutates ledger state.
pub fn peek_at(root: &Path) -> Result<LedgerStatus, LedgerError> {
    let view = load_at(root)?;
    Ok(LedgerStatus {
        pending: view.records.len(),
        is_empty: view.records.is_empty(),
        anomaly: view.anomaly,
    })
}

// ---------------------------------------------------------------------------
// Drain / retain
// ---------------------------------------------------------------------------

/// Return all current records in first-insertion order and atomically empty
/// the ledger. Draining an empty or absent ledger is a no-op, not an error.
///
/// Corruption fails open: the unreadable file is preserved by renaming it to
/// `pending-changes.corrupt` (never overwritten) and the view reports the
/// anomaly.
pub fn drain_at(root: &Path) -> Result<LedgerView, LedgerError> {
    let path = ledger_path_at(root);
    match read_raw(root)? {
        RawLedger::Absent => Ok(LedgerView::default()),
        RawLedger::Text(text) => {
            let records = parse(&text);
            if !records.is_empty() || !text.is_empty() {
                rewrite(&path, &[])?;
            }
            Ok(LedgerView {
                records,
                anomaly: None,
            })
        }
        RawLedger::Corrupt(anomaly) => {
            let preserved = corrupt_path_at(root);
            std::fs::rename(&path, &preserved).map_err(|e| io_err(&path, e))?;
            tracing::warn!("{anomaly}; original preserved at {}", preserved.display());
            Ok(LedgerView {
                records: Vec::new(),
                anomaly: Some(format!(
                    "{anomaly}; original preserved at {}",
                    preserved.display()
                )),
            })
        }
    }
}

/// Rewrite the ledger keeping only records whose path is *not* in
/// `processed`, preserving first-insertion order. Partial-success support:
/// the unprocessed subset stays pending for the next boundary.
///
/// Returns the number of records still pending.
pub fn retain_pending_at(root: &Path, processed: &[PathBuf]) -> Result<usize, LedgerError> {
    let view = load_at(root)?;
    if view.records.is_empty() {
        return Ok(0);
    }
    let remaining: Vec<&ChangeRecord> = view
        .records
        .iter()
        .filter(|r| !processed.contains(&r.path))
        .collect();
    let lines: Vec<String> = remaining
        .iter()
        .map(|r| format_line(&r.path, r.context.as_deref()))
        .collect();
    rewrite(&ledger_path_at(root), &lines)?;
    Ok(remaining.len())
}

/// Atomic rewrite: `.tmp` sibling + rename.
fn rewrite(path: &Path, lines: &[String]) -> Result<(), LedgerError> {
    let mut content = lines.join("\n");
    if !content.is_empty() {
        content.push('\n');
    }
    let tmp = PathBuf::from(format!("{}.tmp", path.display()));
    std::fs::write(&tmp, content).map_err(|e| io_err(&tmp, e))?;
    std::fs::rename(&tmp, path).map_err(|e| io_err(path, e))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
