//! `automem section` — read/write plumbing for machine-owned sections.
//!
//! This is the surface the isolated worker drives: it reads a section,
//! produces new prose elsewhere, and writes it back through the
//! marker-preserving, hash-gated writer.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;

use automem_core::types::SectionName;
use automem_sync::sections::{self, WriteResult};

/// Subcommands for `automem section`.
#[derive(Subcommand, Debug)]
pub enum SectionCommand {
    /// Print a machine-owned section's body.
    Read {
        document: PathBuf,
        name: String,
    },

    /// Replace a machine-owned section's body.
    Write {
        document: PathBuf,
        name: String,

        /// New section body (reads stdin when omitted).
        #[arg(long)]
        content: Option<PathBuf>,

        /// Show what would be written without writing.
        #[arg(long)]
        dry_run: bool,
    },
}

pub fn run(command: SectionCommand) -> Result<()> {
    match command {
        SectionCommand::Read { document, name } => {
            let doc = sections::read_document(&document)
                .with_context(|| format!("failed to read {}", document.display()))?;
            let name = SectionName::from(name.as_str());
            let body = doc
                .read_section(&name)
                .with_context(|| format!("cannot read section '{name}'"))?;
            print!("{body}");
            Ok(())
        }
        SectionCommand::Write {
            document,
            name,
            content,
            dry_run,
        } => {
            let body = super::read_content(content)?;
            let name = SectionName::from(name.as_str());
            let result = sections::write_section_at(&document, &name, &body, dry_run)
                .with_context(|| format!("cannot write section '{name}'"))?;
            match result {
                WriteResult::Written { path } => println!("  ✎  {}", path.display()),
                WriteResult::WouldWrite { path } => println!("  ~  {}", path.display()),
                WriteResult::Unchanged { path } => println!("  ·  {}", path.display()),
            }
            Ok(())
        }
    }
}
