//! `automem boundary` — observe a unit-of-work boundary.
//!
//! Mirrors the stop-hook protocol of the original tooling: on a
//! pass-through nothing is printed and the exit code is 0; on a trigger
//! the full worker request is printed as JSON for the spawning collaborator
//! to consume. Ledger anomalies go to stderr so they never pollute the
//! request stream.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use automem_core::config;
use automem_trigger::{contract, coordinator};

/// Arguments for `automem boundary`.
#[derive(Args, Debug)]
pub struct BoundaryArgs {
    /// The trigger-flag value this caller was last told to hold.
    #[arg(long)]
    pub active: bool,

    /// Project root (defaults to AUTOMEM_PROJECT_DIR, then the current directory).
    #[arg(long)]
    pub root: Option<PathBuf>,
}

impl BoundaryArgs {
    pub fn run(self) -> Result<()> {
        let root = super::resolve_root(self.root)?;
        let decision = coordinator::observe_boundary_at(&root, self.active)
            .context("boundary observation failed")?;

        if let Some(anomaly) = &decision.anomaly {
            eprintln!("warning: {anomaly}");
        }

        let Some(directive) = decision.directive else {
            return Ok(());
        };
        if directive.truncated > 0 {
            eprintln!(
                "warning: directive capped, {} pending record(s) deferred",
                directive.truncated
            );
        }

        let cfg = config::load_at(&root);
        let request = contract::build_request_at(&root, &directive, &cfg);
        println!(
            "{}",
            serde_json::to_string_pretty(&request).context("failed to serialize request")?
        );
        Ok(())
    }
}
