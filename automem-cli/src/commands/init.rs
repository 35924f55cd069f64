//! `automem init` — scaffold the control directory and memory file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use automem_core::types::SectionName;
use automem_core::{config, paths};
use automem_sync::categorize::{ARCHITECTURE, BUILD_COMMANDS, DEPENDENCIES, TESTING};
use automem_sync::sections::{begin_marker, end_marker};

/// Arguments for `automem init`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Project root (defaults to AUTOMEM_PROJECT_DIR, then the current directory).
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// File name of the memory document.
    #[arg(long)]
    pub memory_file: Option<String>,
}

impl InitArgs {
    pub fn run(self) -> Result<()> {
        let root = super::resolve_root(self.root)?;

        let mut cfg = config::load_at(&root);
        if let Some(name) = self.memory_file {
            cfg.memory_file = name;
        }
        config::save_at(&root, &cfg).context("failed to write config")?;
        println!("✓ control directory at {}", paths::control_dir_at(&root).display());

        let document = root.join(&cfg.memory_file);
        if document.exists() {
            println!("· {} already exists — left untouched", document.display());
        } else {
            std::fs::write(&document, starter_document())
                .with_context(|| format!("failed to write {}", document.display()))?;
            println!("✓ scaffolded {}", document.display());
        }
        Ok(())
    }
}

/// Starter memory document: one empty machine-owned section per standard
/// category, plus a human-owned region.
fn starter_document() -> String {
    let mut out = String::from("# Project memory\n");
    for name in [ARCHITECTURE, BUILD_COMMANDS, DEPENDENCIES, TESTING] {
        let name = SectionName::from(name);
        out.push('\n');
        out.push_str(&begin_marker(&name));
        out.push('\n');
        out.push_str("_Not yet documented._\n");
        out.push_str(&end_marker(&name));
        out.push('\n');
    }
    out.push_str(
        "\n<!-- manual:begin -->\n\
         Hand-written notes go here; this region is never rewritten.\n\
         <!-- manual:end -->\n",
    );
    out
}
