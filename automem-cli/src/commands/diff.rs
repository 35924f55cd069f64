//! `automem diff` — preview a proposed section rewrite as a unified diff.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use automem_core::types::SectionName;
use automem_sync::{diff, sections};

/// Arguments for `automem diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// The memory document to diff against.
    pub document: PathBuf,

    /// Machine-owned section name.
    pub section: String,

    /// Proposed section body (reads stdin when omitted).
    #[arg(long)]
    pub content: Option<PathBuf>,
}

impl DiffArgs {
    pub fn run(self) -> Result<()> {
        let document = sections::read_document(&self.document)
            .with_context(|| format!("failed to read {}", self.document.display()))?;
        let body = super::read_content(self.content)?;

        let name = SectionName::from(self.section.as_str());
        let unified = diff::section_diff(&self.document, &document, &name, &body)
            .with_context(|| format!("cannot diff section '{name}'"))?;

        if unified.is_empty() {
            println!("✓ no changes for '{name}'");
        } else {
            print!("{unified}");
        }
        Ok(())
    }
}
