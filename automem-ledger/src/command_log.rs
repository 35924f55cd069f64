//! Successful-command log.
//!
//! One command per line at `<root>/.automem/command-log`, most recent last.
//! Only commands that actually succeeded belong here; the stale-command
//! detector treats this file as its sole evidence base, and an absent file
//! simply means no evidence.

use std::io::Write;
use std::path::{Path, PathBuf};

use automem_core::paths::control_dir_at;

use crate::error::{io_err, LedgerError};

/// `<root>/.automem/command-log` — pure, no I/O.
pub fn command_log_path_at(root: &Path) -> PathBuf {
    control_dir_at(root).join("command-log")
}

/// Append one successful command. Blank commands are ignored.
pub fn record_command_at(root: &Path, command: &str) -> Result<(), LedgerError> {
    let command = command.trim();
    if command.is_empty() {
        return Ok(());
    }
    let path = command_log_path_at(root);
    let Some(dir) = path.parent() else {
        return Err(io_err(path, std::io::Error::other("invalid log path")));
    };
    std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| io_err(&path, e))?;
    writeln!(file, "{command}").map_err(|e| io_err(&path, e))?;
    Ok(())
}

/// The last `limit` successful commands, most recent first. Absent or
/// unreadable log means no evidence — an empty vec.
pub fn recent_commands_at(root: &Path, limit: usize) -> Vec<String> {
    let path = command_log_path_at(root);
    let Ok(contents) = std::fs::read_to_string(&path) else {
        return Vec::new();
    };
    let mut commands: Vec<String> = contents
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();
    commands.reverse();
    commands.truncate(limit);
    commands
}
