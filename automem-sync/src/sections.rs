//! Marker-delimited document regions.
//!
//! A memory document is plain Markdown with two kinds of delimited regions:
//!
//! ```text
//! <!-- automem:begin architecture -->
//! machine-owned content, free to rewrite
//! <!-- automem:end architecture -->
//!
//! <!-- manual:begin -->
//! human-owned content, never touched
//! <!-- manual:end -->
//! ```
//!
//! Parsing never fails: broken marker pairs become [`MarkerIssue`]s, their
//! text stays inert prose, and addressing such a section by name yields
//! [`SyncError::MarkerMismatch`]. Replacing a section splices bytes strictly
//! between its marker pair; everything outside is preserved byte for byte.
//!
//! ## `write_section_at` — write protocol
//!
//! 1. Read and parse the document.
//! 2. Splice the new section body.
//! 3. SHA-256 both versions → skip the write if identical.
//! 4. Write to `<path>.automem.tmp`, rename to final path (atomic on POSIX).

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use automem_core::types::{Ownership, SectionName};

use crate::error::{io_err, SyncError};

const MACHINE_BEGIN_PREFIX: &str = "<!-- automem:begin ";
const MACHINE_END_PREFIX: &str = "<!-- automem:end ";
const MARKER_SUFFIX: &str = " -->";
const HUMAN_BEGIN: &str = "<!-- manual:begin -->";
const HUMAN_END: &str = "<!-- manual:end -->";

/// Render the begin marker line for a section name.
pub fn begin_marker(name: &SectionName) -> String {
    format!("{MACHINE_BEGIN_PREFIX}{name}{MARKER_SUFFIX}")
}

/// Render the end marker line for a section name.
pub fn end_marker(name: &SectionName) -> String {
    format!("{MACHINE_END_PREFIX}{name}{MARKER_SUFFIX}")
}

// ---------------------------------------------------------------------------
// Parsed document
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum RegionKind {
    Machine(SectionName),
    Human,
}

#[derive(Debug, Clone)]
struct Region {
    kind: RegionKind,
    /// Byte offset just past the begin-marker line (including its newline).
    body_start: usize,
    /// Byte offset of the start of the end-marker line.
    body_end: usize,
}

/// A marker problem found while parsing. The affected text is left inert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerIssue {
    /// Section name, when the broken marker carried one.
    pub section: Option<SectionName>,
    /// 1-based line of the offending marker.
    pub line: usize,
    pub detail: String,
}

/// A parsed memory document: raw text plus located regions.
#[derive(Debug, Clone)]
pub struct Document {
    text: String,
    regions: Vec<Region>,
    issues: Vec<MarkerIssue>,
}

impl Document {
    /// Parse a document. Never fails; marker problems are collected as
    /// [`MarkerIssue`]s and the affected regions become unaddressable.
    pub fn parse(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut regions = Vec::new();
        let mut issues = Vec::new();

        // Open machine section: (name, body_start, line number of begin).
        let mut open: Option<(SectionName, usize, usize)> = None;
        // Open human region: (body_start, line number of begin).
        let mut human_open: Option<(usize, usize)> = None;

        let mut offset = 0;
        for (idx, raw_line) in text.split_inclusive('\n').enumerate() {
            let line_no = idx + 1;
            let line_start = offset;
            offset += raw_line.len();
            let line_end = offset;
            let trimmed = raw_line.trim();

            if let Some((body_start, _)) = human_open {
                // Machine markers inside a human region are inert text.
                if trimmed == HUMAN_END {
                    regions.push(Region {
                        kind: RegionKind::Human,
                        body_start,
                        body_end: line_start,
                    });
                    human_open = None;
                }
                continue;
            }

            if let Some((open_name, body_start, open_line)) = open.take() {
                // Inside a machine section only marker lines matter; anything
                // else — including human markers — is body text.
                if let Some(name) = parse_marker(trimmed, MACHINE_END_PREFIX) {
                    if name == open_name {
                        regions.push(Region {
                            kind: RegionKind::Machine(open_name),
                            body_start,
                            body_end: line_start,
                        });
                    } else {
                        issues.push(MarkerIssue {
                            section: Some(open_name.clone()),
                            line: open_line,
                            detail: format!(
                                "section '{open_name}' closed by mismatched end marker '{name}'"
                            ),
                        });
                        issues.push(MarkerIssue {
                            section: Some(name.clone()),
                            line: line_no,
                            detail: format!("end marker '{name}' does not match open section"),
                        });
                    }
                } else if let Some(name) = parse_marker(trimmed, MACHINE_BEGIN_PREFIX) {
                    // A second begin while one is open: the first pair is
                    // broken; start over from the new begin.
                    issues.push(MarkerIssue {
                        section: Some(open_name.clone()),
                        line: open_line,
                        detail: format!("section '{open_name}' has no end marker"),
                    });
                    open = Some((name, line_end, line_no));
                } else {
                    open = Some((open_name, body_start, open_line));
                }
                continue;
            }

            if let Some(name) = parse_marker(trimmed, MACHINE_BEGIN_PREFIX) {
                open = Some((name, line_end, line_no));
            } else if let Some(name) = parse_marker(trimmed, MACHINE_END_PREFIX) {
                issues.push(MarkerIssue {
                    section: Some(name.clone()),
                    line: line_no,
                    detail: format!("end marker '{name}' without a begin marker"),
                });
            } else if trimmed == HUMAN_BEGIN {
                human_open = Some((line_end, line_no));
            } else if trimmed == HUMAN_END {
                issues.push(MarkerIssue {
                    section: None,
                    line: line_no,
                    detail: "human-region end marker without a begin marker".to_string(),
                });
            }
        }

        if let Some((name, _, line)) = open {
            issues.push(MarkerIssue {
                section: Some(name.clone()),
                line,
                detail: format!("section '{name}' has no end marker"),
            });
        }
        if let Some((_, line)) = human_open {
            issues.push(MarkerIssue {
                section: None,
                line,
                detail: "human region has no end marker".to_string(),
            });
        }

        for issue in &issues {
            tracing::warn!("marker issue at line {}: {}", issue.line, issue.detail);
        }

        Self {
            text,
            regions,
            issues,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn issues(&self) -> &[MarkerIssue] {
        &self.issues
    }

    /// Names and ownership of all well-formed regions, in document order.
    /// Human regions are reported with no name.
    pub fn regions(&self) -> Vec<(Option<SectionName>, Ownership)> {
        self.regions
            .iter()
            .map(|r| match &r.kind {
                RegionKind::Machine(name) => (Some(name.clone()), Ownership::MachineOwned),
                RegionKind::Human => (None, Ownership::HumanOwned),
            })
            .collect()
    }

    fn find_machine(&self, name: &SectionName) -> Result<&Region, SyncError> {
        if let Some(region) = self
            .regions
            .iter()
            .find(|r| matches!(&r.kind, RegionKind::Machine(n) if n == name))
        {
            return Ok(region);
        }
        if let Some(issue) = self
            .issues
            .iter()
            .find(|i| i.section.as_ref() == Some(name))
        {
            return Err(SyncError::MarkerMismatch {
                section: name.to_string(),
                line: issue.line,
            });
        }
        Err(SyncError::SectionNotFound {
            section: name.to_string(),
        })
    }

    /// The body of a machine-owned section, markers excluded.
    pub fn read_section(&self, name: &SectionName) -> Result<&str, SyncError> {
        let region = self.find_machine(name)?;
        Ok(&self.text[region.body_start..region.body_end])
    }

    /// A new full document with the named section's body replaced. Bytes
    /// outside the marker pair are untouched. A non-empty body is given a
    /// trailing newline if it lacks one, so the end marker keeps its own
    /// line.
    pub fn replace_section(&self, name: &SectionName, body: &str) -> Result<String, SyncError> {
        let region = self.find_machine(name)?;
        let mut body = body.to_string();
        if !body.is_empty() && !body.ends_with('\n') {
            body.push('\n');
        }
        let mut out = String::with_capacity(self.text.len() + body.len());
        out.push_str(&self.text[..region.body_start]);
        out.push_str(&body);
        out.push_str(&self.text[region.body_end..]);
        Ok(out)
    }
}

fn parse_marker(trimmed: &str, prefix: &str) -> Option<SectionName> {
    let name = trimmed.strip_prefix(prefix)?.strip_suffix(MARKER_SUFFIX)?;
    let name = name.trim();
    if name.is_empty() || name.contains(char::is_whitespace) {
        return None;
    }
    Some(SectionName::from(name))
}

// ---------------------------------------------------------------------------
// File-level operations
// ---------------------------------------------------------------------------

/// Outcome of a section write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written (section body changed).
    Written { path: PathBuf },
    /// File was skipped — the new document hashes identically.
    Unchanged { path: PathBuf },
    /// Dry-run mode: the file *would* have been written.
    WouldWrite { path: PathBuf },
}

/// Read and parse the document at `path`.
pub fn read_document(path: &Path) -> Result<Document, SyncError> {
    let text = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    Ok(Document::parse(text))
}

/// Replace one machine-owned section on disk, hash-gated and atomic.
pub fn write_section_at(
    path: &Path,
    name: &SectionName,
    body: &str,
    dry_run: bool,
) -> Result<WriteResult, SyncError> {
    let document = read_document(path)?;
    let updated = document.replace_section(name, body)?;

    if digest(&updated) == digest(document.text()) {
        tracing::debug!("unchanged: {}", path.display());
        return Ok(WriteResult::Unchanged {
            path: path.to_path_buf(),
        });
    }

    if dry_run {
        tracing::info!("[dry-run] would write: {}", path.display());
        return Ok(WriteResult::WouldWrite {
            path: path.to_path_buf(),
        });
    }

    let tmp = PathBuf::from(format!("{}.automem.tmp", path.display()));
    std::fs::write(&tmp, &updated).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }

    tracing::info!("wrote: {}", path.display());
    Ok(WriteResult::Written {
        path: path.to_path_buf(),
    })
}

fn digest(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

// ---------------------------------------------------------------------------
// Governing documents
// ---------------------------------------------------------------------------

/// Resolve which memory documents govern the given changed paths.
///
/// For each changed path, the nearest enclosing directory (up to `root`)
/// that contains `memory_file` contributes its document. The root document
/// is always included as a fallback, whether or not it exists yet.
/// Deduplicated, nearest documents first, root last.
pub fn governing_documents_at(
    root: &Path,
    changed: &[PathBuf],
    memory_file: &str,
) -> Vec<PathBuf> {
    let root_doc = root.join(memory_file);
    let mut documents = Vec::new();

    for path in changed {
        let mut dir = path.parent();
        while let Some(d) = dir {
            let candidate = d.join(memory_file);
            if candidate != root_doc && candidate.is_file() {
                if !documents.contains(&candidate) {
                    documents.push(candidate);
                }
                break;
            }
            if d == root {
                break;
            }
            dir = d.parent();
        }
    }

    documents.push(root_doc);
    documents
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
