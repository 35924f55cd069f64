//! `automem config` — read and change persisted configuration.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Subcommand;

use automem_core::config;

/// Subcommands for `automem config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print one key, or the whole configuration when no key is given.
    Get {
        key: Option<String>,

        /// Project root (defaults to AUTOMEM_PROJECT_DIR, then the current directory).
        #[arg(long)]
        root: Option<PathBuf>,
    },

    /// Set one key and persist the configuration.
    Set {
        key: String,
        value: String,

        /// Project root (defaults to AUTOMEM_PROJECT_DIR, then the current directory).
        #[arg(long)]
        root: Option<PathBuf>,
    },
}

pub fn run(command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Get { key, root } => {
            let root = super::resolve_root(root)?;
            let cfg = config::load_at(&root);
            match key.as_deref() {
                None => print!("{}", serde_yaml::to_string(&cfg).context("serialize config")?),
                Some("trigger-mode") => println!("{}", cfg.trigger_mode),
                Some("memory-file") => println!("{}", cfg.memory_file),
                Some("max-files") => println!("{}", cfg.limits.max_files),
                Some("max-deps-per-file") => println!("{}", cfg.limits.max_deps_per_file),
                Some("directive-max-files") => println!("{}", cfg.limits.directive_max_files),
                Some(other) => bail!("unknown config key '{other}'"),
            }
            Ok(())
        }
        ConfigCommand::Set { key, value, root } => {
            let root = super::resolve_root(root)?;
            let mut cfg = config::load_at(&root);
            match key.as_str() {
                "trigger-mode" => {
                    cfg.trigger_mode = value.parse().map_err(anyhow::Error::msg)?;
                }
                "memory-file" => cfg.memory_file = value,
                "max-files" => cfg.limits.max_files = parse_limit(&key, &value)?,
                "max-deps-per-file" => {
                    cfg.limits.max_deps_per_file = parse_limit(&key, &value)?;
                }
                "directive-max-files" => {
                    cfg.limits.directive_max_files = parse_limit(&key, &value)?;
                }
                other => bail!("unknown config key '{other}'"),
            }
            config::save_at(&root, &cfg).context("failed to write config")?;
            println!("✓ {key} set");
            Ok(())
        }
    }
}

fn parse_limit(key: &str, value: &str) -> Result<usize> {
    let parsed: usize = value
        .parse()
        .with_context(|| format!("'{key}' expects a positive integer, got '{value}'"))?;
    if parsed == 0 {
        bail!("'{key}' must be at least 1");
    }
    Ok(parsed)
}
