//! Per-project YAML configuration.
//!
//! Stored at `<root>/.automem/config.yaml`. A missing or unreadable file is
//! never an error: loads fall open to [`Config::default`], because recording
//! and boundary handling must keep working even when configuration was never
//! written or has been mangled.
//!
//! # API pattern
//!
//! Every function takes an explicit project root (`_at(root, …)`); callers
//! that want ambient resolution do it themselves. Tests always use `_at`
//! with `tempfile::TempDir`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{io_err, ConfigError};
use crate::paths::config_path_at;
use crate::types::{PassLimits, TriggerMode};

/// Default file name of the memory document maintained by the engine.
pub const DEFAULT_MEMORY_FILE: &str = "CLAUDE.md";

/// Persisted engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub trigger_mode: TriggerMode,
    /// File name of the memory document (same name at every directory level).
    #[serde(default = "default_memory_file")]
    pub memory_file: String,
    #[serde(default)]
    pub limits: PassLimits,
}

fn default_memory_file() -> String {
    DEFAULT_MEMORY_FILE.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trigger_mode: TriggerMode::default(),
            memory_file: default_memory_file(),
            limits: PassLimits::default(),
        }
    }
}

/// Load the configuration for the project at `root`.
///
/// Absent or unparseable files yield [`Config::default`]; this read never
/// fails.
pub fn load_at(root: &Path) -> Config {
    let path = config_path_at(root);
    let Ok(contents) = std::fs::read_to_string(&path) else {
        return Config::default();
    };
    match serde_yaml::from_str(&contents) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("unreadable config at {}: {err}; using defaults", path.display());
            Config::default()
        }
    }
}

/// Save the configuration atomically (`.tmp` sibling + rename).
pub fn save_at(root: &Path, config: &Config) -> Result<(), ConfigError> {
    let path = config_path_at(root);
    let Some(dir) = path.parent() else {
        return Err(io_err(
            path,
            std::io::Error::other("invalid config path"),
        ));
    };
    std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;

    let yaml = serde_yaml::to_string(config)?;
    let tmp = path.with_extension("yaml.tmp");
    std::fs::write(&tmp, yaml).map_err(|e| io_err(&tmp, e))?;
    std::fs::rename(&tmp, &path).map_err(|e| io_err(&path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn missing_config_falls_open_to_defaults() {
        let root = TempDir::new().unwrap();
        let config = load_at(root.path());
        assert_eq!(config, Config::default());
        assert_eq!(config.trigger_mode, TriggerMode::Default);
        assert_eq!(config.memory_file, "CLAUDE.md");
    }

    #[test]
    fn unreadable_config_falls_open_to_defaults() {
        let root = TempDir::new().unwrap();
        let path = config_path_at(root.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, ": : not yaml : [broken").unwrap();

        let config = load_at(root.path());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn save_load_roundtrip() {
        let root = TempDir::new().unwrap();
        let config = Config {
            trigger_mode: TriggerMode::CommitOnly,
            memory_file: "AGENTS.md".to_string(),
            limits: PassLimits {
                directive_max_files: 10,
                max_files: 4,
                max_deps_per_file: 2,
            },
        };
        save_at(root.path(), &config).expect("save");
        assert_eq!(load_at(root.path()), config);
    }

    #[test]
    fn save_cleans_up_tmp_file() {
        let root = TempDir::new().unwrap();
        save_at(root.path(), &Config::default()).expect("save");
        let tmp = config_path_at(root.path()).with_extension("yaml.tmp");
        assert!(!tmp.exists(), ".tmp must be gone after atomic save");
    }

    #[test]
    fn partial_config_fills_missing_fields_with_defaults() {
        let root = TempDir::new().unwrap();
        let path = config_path_at(root.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "trigger_mode: commit-only\n").unwrap();

        let config = load_at(root.path());
        assert_eq!(config.trigger_mode, TriggerMode::CommitOnly);
        assert_eq!(config.memory_file, "CLAUDE.md");
        assert_eq!(config.limits, PassLimits::default());
    }
}
