//! Boundary coordination — the Idle/Triggered state machine.
//!
//! [`decide`] is the pure core: it takes the merged ledger view, the
//! configured mode, the current flag value, and the pass limits, and
//! returns the new flag value plus an optional directive. The flag is
//! threaded through explicitly as an input/output value so the machine is
//! testable with no filesystem or ambient state.
//!
//! [`observe_boundary_at`] is the I/O wrapper: it loads the persisted flag,
//! the ledger, and the config, calls [`decide`], persists the new flag, and
//! hands the decision back to the caller. It is the sole writer of the
//! authoritative flag copy.

use std::path::Path;

use automem_core::config;
use automem_core::types::{ChangeRecord, PassLimits, TriggerMode};
use automem_ledger::store;

use crate::error::TriggerError;
use crate::state;

/// The single "process now" directive emitted on an Idle → Triggered
/// transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncDirective {
    /// Distinct files to process, first-insertion order, capped.
    pub files: Vec<ChangeRecord>,
    /// How many pending records the cap cut off.
    pub truncated: usize,
}

/// Outcome of one boundary observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryDecision {
    /// New value of the trigger flag; the caller reports this value back at
    /// the next boundary.
    pub active: bool,
    /// Present only on the Idle → Triggered transition.
    pub directive: Option<SyncDirective>,
    /// Ledger anomaly to surface in the next summary, if any.
    pub anomaly: Option<String>,
}

impl BoundaryDecision {
    fn pass_through(anomaly: Option<String>) -> Self {
        Self {
            active: false,
            directive: None,
            anomaly,
        }
    }
}

/// Decide what happens at a batch boundary.
///
/// `records` is the merged ledger view (already deduplicated, in
/// first-insertion order). Exactly one of three things happens:
///
/// - flag set → pass-through, flag reset (the boundary that follows a
///   trigger is always consumed, success or not);
/// - nothing worth triggering on → pass-through, flag stays unset;
/// - otherwise → directive emitted, flag set.
pub fn decide(
    records: &[ChangeRecord],
    mode: TriggerMode,
    active: bool,
    limits: &PassLimits,
) -> BoundaryDecision {
    if active {
        tracing::debug!("boundary while pass in flight: pass-through, flag reset");
        return BoundaryDecision::pass_through(None);
    }
    if records.is_empty() {
        return BoundaryDecision::pass_through(None);
    }
    if mode == TriggerMode::CommitOnly && !records.iter().any(ChangeRecord::has_commit_context) {
        tracing::debug!("commit-only mode and no commit-shaped context: pass-through");
        return BoundaryDecision::pass_through(None);
    }

    let cap = limits.directive_max_files;
    let truncated = records.len().saturating_sub(cap);
    let files: Vec<ChangeRecord> = records.iter().take(cap).cloned().collect();
    BoundaryDecision {
        active: true,
        directive: Some(SyncDirective { files, truncated }),
        anomaly: None,
    }
}

/// Observe a batch boundary for the project at `root`.
///
/// `reported_active` is the flag value the external collaborator was last
/// told to hold; the persisted copy is authoritative, but a reported
/// `true` is honored even when the persisted copy was lost — over-guarding
/// is safe, re-triggering forever is not.
pub fn observe_boundary_at(
    root: &Path,
    reported_active: bool,
) -> Result<BoundaryDecision, TriggerError> {
    let persisted = state::load_flag_at(root)?;
    let active = persisted || reported_active;

    let view = store::load_at(root)?;
    let cfg = config::load_at(root);
    let mut decision = decide(&view.records, cfg.trigger_mode, active, &cfg.limits);
    if decision.anomaly.is_none() {
        decision.anomaly = view.anomaly;
    }

    if decision.active != persisted {
        state::save_flag_at(root, decision.active)?;
    }
    Ok(decision)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use automem_core::config::Config;
    use tempfile::TempDir;

    use super::*;

    fn limits() -> PassLimits {
        PassLimits::default()
    }

    fn plain(path: &str) -> ChangeRecord {
        ChangeRecord::new(path)
    }

    fn committed(path: &str) -> ChangeRecord {
        ChangeRecord::with_context(path, "a1b2c3d: fix bug")
    }

    #[test]
    fn empty_ledger_is_a_pass_through() {
        let decision = decide(&[], TriggerMode::Default, false, &limits());
        assert!(!decision.active);
        assert!(decision.directive.is_none());
    }

    #[test]
    fn pending_changes_trigger_and_set_flag() {
        let records = vec![plain("/repo/a.py"), committed("/repo/b.py")];
        let decision = decide(&records, TriggerMode::Default, false, &limits());
        assert!(decision.active);
        let directive = decision.directive.expect("directive");
        assert_eq!(
            directive.files.iter().map(|r| r.path.clone()).collect::<Vec<_>>(),
            vec![PathBuf::from("/repo/a.py"), PathBuf::from("/repo/b.py")]
        );
        assert_eq!(directive.files[1].context.as_deref(), Some("a1b2c3d: fix bug"));
        assert_eq!(directive.truncated, 0);
    }

    #[test]
    fn active_flag_forces_pass_through_and_resets() {
        let records = vec![plain("/repo/a.py")];
        let decision = decide(&records, TriggerMode::Default, true, &limits());
        assert!(!decision.active);
        assert!(decision.directive.is_none());
    }

    #[test]
    fn two_boundaries_after_trigger_leave_flag_unset() {
        let records = vec![plain("/repo/a.py")];
        let first = decide(&records, TriggerMode::Default, false, &limits());
        assert!(first.active);
        let second = decide(&records, TriggerMode::Default, first.active, &limits());
        assert!(!second.active, "pass-through boundary must reset the flag");
    }

    #[test]
    fn commit_only_ignores_plain_batches() {
        let records = vec![plain("/repo/a.py"), plain("/repo/b.py")];
        let decision = decide(&records, TriggerMode::CommitOnly, false, &limits());
        assert!(!decision.active);
        assert!(decision.directive.is_none());
    }

    #[test]
    fn commit_only_triggers_when_any_record_is_commit_shaped() {
        let records = vec![plain("/repo/a.py"), committed("/repo/b.py")];
        let decision = decide(&records, TriggerMode::CommitOnly, false, &limits());
        assert!(decision.active);
        assert!(decision.directive.is_some());
    }

    #[test]
    fn directive_is_capped_in_first_insertion_order() {
        let records: Vec<ChangeRecord> = (0..25)
            .map(|i| plain(&format!("/repo/file{i:02}.py")))
            .collect();
        let decision = decide(&records, TriggerMode::Default, false, &limits());
        let directive = decision.directive.expect("directive");
        assert_eq!(directive.files.len(), 20);
        assert_eq!(directive.truncated, 5);
        assert_eq!(directive.files[0].path, PathBuf::from("/repo/file00.py"));
        assert_eq!(directive.files[19].path, PathBuf::from("/repo/file19.py"));
    }

    #[test]
    fn observe_boundary_persists_flag_and_leaves_ledger_pending() {
        let root = TempDir::new().unwrap();
        store::record_at(root.path(), Path::new("/repo/a.py"), None, "CLAUDE.md").unwrap();
        store::record_at(
            root.path(),
            Path::new("/repo/b.py"),
            Some("h1234567: fix bug"),
            "CLAUDE.md",
        )
        .unwrap();

        let first = observe_boundary_at(root.path(), false).expect("boundary");
        assert!(first.active);
        let directive = first.directive.expect("directive");
        assert_eq!(directive.files.len(), 2);
        assert!(state::load_flag_at(root.path()).unwrap());

        // No successful drain happened: the next boundary is a pass-through
        // and the ledger is unchanged.
        let second = observe_boundary_at(root.path(), first.active).expect("boundary");
        assert!(!second.active);
        assert!(second.directive.is_none());
        assert!(!state::load_flag_at(root.path()).unwrap());
        assert_eq!(store::peek_at(root.path()).unwrap().pending, 2);
    }

    #[test]
    fn reported_active_is_honored_when_persisted_copy_is_lost() {
        let root = TempDir::new().unwrap();
        store::record_at(root.path(), Path::new("/repo/a.py"), None, "CLAUDE.md").unwrap();

        let decision = observe_boundary_at(root.path(), true).expect("boundary");
        assert!(!decision.active);
        assert!(decision.directive.is_none());
    }

    #[test]
    fn commit_only_mode_is_read_from_config() {
        let root = TempDir::new().unwrap();
        let cfg = Config {
            trigger_mode: TriggerMode::CommitOnly,
            ..Config::default()
        };
        config::save_at(root.path(), &cfg).unwrap();
        store::record_at(root.path(), Path::new("/repo/a.py"), None, "CLAUDE.md").unwrap();

        let decision = observe_boundary_at(root.path(), false).expect("boundary");
        assert!(!decision.active, "plain edit must not trigger in commit-only mode");
    }

    #[test]
    fn corrupt_ledger_is_a_pass_through_with_anomaly() {
        let root = TempDir::new().unwrap();
        let path = store::ledger_path_at(root.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, [0xff, 0xfe]).unwrap();

        let decision = observe_boundary_at(root.path(), false).expect("boundary");
        assert!(!decision.active);
        assert!(decision.directive.is_none());
        assert!(decision.anomaly.is_some());
        assert!(path.exists(), "boundary must not destroy the corrupt ledger");
    }
}
