//! `automem record` / `automem record-command` — hook-facing recorders.
//!
//! Both stay silent on success: the recording hooks run after every edit
//! and every command, and their output would be pure noise in that stream.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use automem_core::config;
use automem_ledger::{command_log, store};

/// Arguments for `automem record`.
#[derive(Args, Debug)]
pub struct RecordArgs {
    /// Absolute paths of changed files.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Causal annotation, e.g. "a1b2c3d: fix login bug".
    #[arg(long)]
    pub context: Option<String>,

    /// Project root (defaults to AUTOMEM_PROJECT_DIR, then the current directory).
    #[arg(long)]
    pub root: Option<PathBuf>,
}

impl RecordArgs {
    pub fn run(self) -> Result<()> {
        let root = super::resolve_root(self.root)?;
        let cfg = config::load_at(&root);
        // Invalid paths are skipped inside record_many_at; recording never
        // surfaces them to the hook.
        store::record_many_at(
            &root,
            &self.paths,
            self.context.as_deref(),
            &cfg.memory_file,
        )
        .context("failed to append to the change ledger")?;
        Ok(())
    }
}

/// Arguments for `automem record-command`.
#[derive(Args, Debug)]
pub struct RecordCommandArgs {
    /// The shell command that ran.
    pub command: String,

    /// The command's exit code; only 0 is recorded as evidence.
    #[arg(long, default_value_t = 0)]
    pub exit_code: i32,

    /// Project root (defaults to AUTOMEM_PROJECT_DIR, then the current directory).
    #[arg(long)]
    pub root: Option<PathBuf>,
}

impl RecordCommandArgs {
    pub fn run(self) -> Result<()> {
        if self.exit_code != 0 {
            return Ok(());
        }
        let root = super::resolve_root(self.root)?;
        command_log::record_command_at(&root, &self.command)
            .context("failed to append to the command log")?;
        Ok(())
    }
}
