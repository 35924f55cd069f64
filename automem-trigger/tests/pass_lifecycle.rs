//! Boundary → directive → outcome lifecycle across the ledger and the
//! coordinator.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use automem_core::config::Config;
use automem_ledger::store;
use automem_trigger::{contract, coordinator, state, SyncOutcome, SyncStatus};

const MEMORY_FILE: &str = "CLAUDE.md";

fn record(root: &Path, path: &str, context: Option<&str>) {
    store::record_at(root, Path::new(path), context, MEMORY_FILE).expect("record");
}

#[test]
fn directive_then_pass_through_leaves_ledger_pending() {
    let root = TempDir::new().expect("root");
    record(root.path(), "/repo/a.py", None);
    record(root.path(), "/repo/b.py", Some("h1: fix bug"));

    // Boundary 1: Idle → Triggered.
    let first = coordinator::observe_boundary_at(root.path(), false).expect("boundary");
    assert!(first.active);
    let directive = first.directive.expect("directive");
    assert_eq!(
        directive
            .files
            .iter()
            .map(|r| r.path.clone())
            .collect::<Vec<_>>(),
        vec![PathBuf::from("/repo/a.py"), PathBuf::from("/repo/b.py")]
    );
    assert_eq!(directive.files[0].context, None);
    assert_eq!(directive.files[1].context.as_deref(), Some("h1: fix bug"));

    // Boundary 2: Triggered → Idle, no directive, nothing drained — the
    // worker result is not part of this exchange.
    let second = coordinator::observe_boundary_at(root.path(), true).expect("boundary");
    assert!(!second.active);
    assert!(second.directive.is_none());
    assert!(!state::load_flag_at(root.path()).expect("flag"));
    assert_eq!(store::peek_at(root.path()).expect("peek").pending, 2);
}

#[test]
fn partial_outcome_retriggers_with_the_remainder() {
    let root = TempDir::new().expect("root");
    record(root.path(), "/repo/a.py", None);
    record(root.path(), "/repo/b.py", None);

    let first = coordinator::observe_boundary_at(root.path(), false).expect("boundary");
    let directive = first.directive.expect("directive");
    let request = contract::build_request_at(root.path(), &directive, &Config::default());
    assert_eq!(request.files.len(), 2);
    assert_eq!(request.documents, vec![root.path().join(MEMORY_FILE)]);

    // The worker processed only a.py.
    let outcome = SyncOutcome {
        status: SyncStatus::Partial {
            processed: vec![PathBuf::from("/repo/a.py")],
        },
        modified: vec![],
        summary: "partial".to_string(),
    };
    contract::apply_outcome_at(root.path(), &outcome).expect("apply");

    // Boundary 2 consumes the in-flight flag.
    let second = coordinator::observe_boundary_at(root.path(), first.active).expect("boundary");
    assert!(second.directive.is_none());

    // Boundary 3 re-triggers with exactly the unprocessed remainder.
    let third = coordinator::observe_boundary_at(root.path(), second.active).expect("boundary");
    let directive = third.directive.expect("directive");
    assert_eq!(directive.files.len(), 1);
    assert_eq!(directive.files[0].path, PathBuf::from("/repo/b.py"));
}

#[test]
fn total_failure_keeps_the_whole_batch_for_the_next_boundary() {
    let root = TempDir::new().expect("root");
    record(root.path(), "/repo/a.py", None);

    let first = coordinator::observe_boundary_at(root.path(), false).expect("boundary");
    assert!(first.active);

    let outcome = SyncOutcome {
        status: SyncStatus::Failed,
        modified: vec![],
        summary: "worker timed out".to_string(),
    };
    contract::apply_outcome_at(root.path(), &outcome).expect("apply");

    let second = coordinator::observe_boundary_at(root.path(), first.active).expect("boundary");
    assert!(!second.active, "flag resets regardless of worker failure");

    let third = coordinator::observe_boundary_at(root.path(), second.active).expect("boundary");
    let directive = third.directive.expect("directive");
    assert_eq!(directive.files[0].path, PathBuf::from("/repo/a.py"));
}
