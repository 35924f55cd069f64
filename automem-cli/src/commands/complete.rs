//! `automem complete` — apply a worker outcome report to the ledger.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use automem_trigger::{contract, SyncOutcome, SyncStatus};

/// Arguments for `automem complete`.
#[derive(Args, Debug)]
pub struct CompleteArgs {
    /// Worker outcome report as JSON (reads stdin when omitted).
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Project root (defaults to AUTOMEM_PROJECT_DIR, then the current directory).
    #[arg(long)]
    pub root: Option<PathBuf>,
}

impl CompleteArgs {
    pub fn run(self) -> Result<()> {
        let root = super::resolve_root(self.root)?;
        let raw = super::read_content(self.report)?;
        let outcome: SyncOutcome =
            serde_json::from_str(&raw).context("malformed worker outcome report")?;

        let applied = contract::apply_outcome_at(&root, &outcome)
            .context("failed to apply outcome to the ledger")?;

        match &outcome.status {
            SyncStatus::Complete => println!(
                "{} pass complete — {} record(s) drained",
                "✓".green(),
                applied.drained
            ),
            SyncStatus::Partial { .. } => println!(
                "{} partial pass — {} drained, {} still pending",
                "~".yellow(),
                applied.drained,
                applied.remaining
            ),
            SyncStatus::Failed => println!(
                "{} pass failed — ledger retained ({} pending)",
                "✗".red(),
                applied.remaining
            ),
        }
        for edit in &outcome.modified {
            println!("  ✎  {}#{}", edit.document.display(), edit.section);
        }
        if !outcome.summary.is_empty() {
            println!("  {}", outcome.summary);
        }
        Ok(())
    }
}
