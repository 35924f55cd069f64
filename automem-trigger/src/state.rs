//! Persisted trigger flag.
//!
//! The authoritative copy of `TriggerState.active` lives in a one-line file
//! at `<root>/.automem/trigger-state` (`1` active, `0` or absent inactive).
//! [`crate::observe_boundary_at`] is the only writer; everyone else treats
//! the externally reported value as a hint.

use std::path::{Path, PathBuf};

use automem_core::paths::control_dir_at;

use crate::error::{io_err, TriggerError};

/// `<root>/.automem/trigger-state` — pure, no I/O.
pub fn state_path_at(root: &Path) -> PathBuf {
    control_dir_at(root).join("trigger-state")
}

/// Load the persisted flag. Absent file means inactive.
pub fn load_flag_at(root: &Path) -> Result<bool, TriggerError> {
    let path = state_path_at(root);
    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(contents.trim() == "1"),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(io_err(&path, err)),
    }
}

/// Persist the flag atomically (`.tmp` sibling + rename).
pub fn save_flag_at(root: &Path, active: bool) -> Result<(), TriggerError> {
    let path = state_path_at(root);
    let Some(dir) = path.parent() else {
        return Err(io_err(path, std::io::Error::other("invalid state path")));
    };
    std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;

    let tmp = PathBuf::from(format!("{}.tmp", path.display()));
    std::fs::write(&tmp, if active { "1\n" } else { "0\n" }).map_err(|e| io_err(&tmp, e))?;
    std::fs::rename(&tmp, &path).map_err(|e| io_err(&path, e))?;
    Ok(())
}
