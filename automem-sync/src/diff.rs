//! Unified diff of a proposed section rewrite.
//!
//! Used by `automem diff` to preview what a worker's section edit would do
//! to a document. No files are written.

use std::path::Path;

use similar::TextDiff;

use automem_core::types::SectionName;

use crate::error::SyncError;
use crate::sections::Document;

/// Render a unified diff between the document as it is and the document
/// with `name`'s body replaced by `new_body`.
///
/// Returns an empty string when the replacement is a no-op.
pub fn section_diff(
    document_path: &Path,
    document: &Document,
    name: &SectionName,
    new_body: &str,
) -> Result<String, SyncError> {
    let updated = document.replace_section(name, new_body)?;
    if updated == document.text() {
        return Ok(String::new());
    }

    let old_header = format!("a/{}", document_path.display());
    let new_header = format!("b/{}", document_path.display());
    let unified = TextDiff::from_lines(document.text(), &updated)
        .unified_diff()
        .header(&old_header, &new_header)
        .context_radius(3)
        .to_string();
    Ok(unified)
}
