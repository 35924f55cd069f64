//! `automem status` — pending changes, trigger state, and the last pass.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use automem_core::config;
use automem_ledger::store;
use automem_trigger::{contract, state};

/// Arguments for `automem status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,

    /// Project root (defaults to AUTOMEM_PROJECT_DIR, then the current directory).
    #[arg(long)]
    pub root: Option<PathBuf>,
}

#[derive(Serialize)]
struct StatusJson {
    trigger_mode: String,
    memory_file: String,
    active: bool,
    pending: usize,
    records: Vec<RecordJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    anomaly: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_pass_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_pass_summary: Option<String>,
}

#[derive(Serialize)]
struct RecordJson {
    path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<String>,
}

#[derive(Tabled)]
struct PendingRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "path")]
    path: String,
    #[tabled(rename = "context")]
    context: String,
}

impl StatusArgs {
    pub fn run(self) -> Result<()> {
        let root = super::resolve_root(self.root)?;
        let cfg = config::load_at(&root);
        let view = store::load_at(&root).context("failed to read the change ledger")?;
        let active = state::load_flag_at(&root).context("failed to read trigger state")?;
        let last_pass = contract::load_pass_record_at(&root);

        let mut anomaly = view.anomaly.clone();
        if anomaly.is_none() && store::corrupt_path_at(&root).exists() {
            anomaly = Some(format!(
                "a corrupt ledger was preserved at {}",
                store::corrupt_path_at(&root).display()
            ));
        }

        if self.json {
            let report = StatusJson {
                trigger_mode: cfg.trigger_mode.to_string(),
                memory_file: cfg.memory_file.clone(),
                active,
                pending: view.records.len(),
                records: view
                    .records
                    .iter()
                    .map(|r| RecordJson {
                        path: r.path.clone(),
                        context: r.context.clone(),
                    })
                    .collect(),
                anomaly,
                last_pass_at: last_pass.as_ref().map(|p| p.finished_at),
                last_pass_summary: last_pass
                    .map(|p| p.outcome.summary)
                    .filter(|s| !s.is_empty()),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        println!("mode:        {}", cfg.trigger_mode);
        println!("memory file: {}", cfg.memory_file);
        println!(
            "trigger:     {}",
            if active {
                "active (pass in flight)".yellow().to_string()
            } else {
                "idle".normal().to_string()
            }
        );
        match &last_pass {
            Some(pass) => println!("last pass:   {} ago", format_age(pass.finished_at)),
            None => println!("last pass:   never"),
        }
        if let Some(anomaly) = &anomaly {
            println!("{} {}", "warning:".red(), anomaly);
        }

        if view.records.is_empty() {
            println!("\n{} nothing pending", "✓".green());
            return Ok(());
        }

        println!(
            "\n{} pending change(s):",
            view.records.len().to_string().bold()
        );
        let rows: Vec<PendingRow> = view
            .records
            .iter()
            .enumerate()
            .map(|(i, r)| PendingRow {
                index: i + 1,
                path: r.path.display().to_string(),
                context: r.context.clone().unwrap_or_default(),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        Ok(())
    }
}

/// Compact age: `42s`, `5m`, `3h`, `2d`.
fn format_age(timestamp: DateTime<Utc>) -> String {
    let seconds = Utc::now()
        .signed_duration_since(timestamp)
        .num_seconds()
        .max(0) as u64;
    if seconds < 60 {
        return format!("{seconds}s");
    }
    if seconds < 60 * 60 {
        return format!("{}m", seconds / 60);
    }
    if seconds < 60 * 60 * 24 {
        return format!("{}h", seconds / (60 * 60));
    }
    format!("{}d", seconds / (60 * 60 * 24))
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn age_formatting_is_compact() {
        assert_eq!(format_age(Utc::now()), "0s");
        assert_eq!(format_age(Utc::now() - Duration::seconds(65)), "1m");
        assert_eq!(format_age(Utc::now() - Duration::hours(3)), "3h");
        assert_eq!(format_age(Utc::now() - Duration::days(2)), "2d");
    }
}
