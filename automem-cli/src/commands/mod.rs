pub mod boundary;
pub mod complete;
pub mod config;
pub mod diff;
pub mod init;
pub mod record;
pub mod section;
pub mod status;

use std::path::PathBuf;

use anyhow::{Context, Result};

/// Resolve the project root: explicit `--root`, then `AUTOMEM_PROJECT_DIR`,
/// then the current directory.
pub fn resolve_root(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(root) = flag {
        return Ok(root);
    }
    if let Ok(dir) = std::env::var("AUTOMEM_PROJECT_DIR") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    std::env::current_dir().context("could not determine working directory")
}

/// Read `--content <file>` or stdin when the flag is absent.
pub fn read_content(content: Option<PathBuf>) -> Result<String> {
    match content {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            use std::io::Read;
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            Ok(buffer)
        }
    }
}
