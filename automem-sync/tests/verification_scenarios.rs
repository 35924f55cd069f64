//! Removal-verification and stale-command scenarios against a real
//! repository tree.

use std::fs;

use tempfile::TempDir;

use automem_core::types::{DocumentedFact, FactSource};
use automem_ledger::command_log;
use automem_sync::verify::{
    review_command, verify_removal, FsSearch, LogCommandHistory, RemovalVerdict,
};
use automem_sync::CommandVerdict;

#[test]
fn pattern_fact_removed_on_clean_change_local_search() {
    let repo = TempDir::new().expect("repo");
    fs::create_dir_all(repo.path().join("src")).expect("mkdir");
    fs::write(repo.path().join("src/format.py"), "indent = '    '\n").expect("write");

    let fact = DocumentedFact::new("uses tabs for indentation", FactSource::Pattern);
    let verdict = verify_removal(&fact, &[repo.path().join("src")], &FsSearch::new(repo.path()));
    assert_eq!(verdict, RemovalVerdict::Remove);
}

#[test]
fn convention_fact_kept_when_present_in_untouched_directory() {
    let repo = TempDir::new().expect("repo");
    fs::create_dir_all(repo.path().join("src")).expect("mkdir");
    fs::create_dir_all(repo.path().join("legacy")).expect("mkdir");
    fs::write(
        repo.path().join("legacy/editorconfig.md"),
        "uses 2-space indentation everywhere\n",
    )
    .expect("write");

    let fact = DocumentedFact::new("uses 2-space indentation", FactSource::Convention);
    let verdict = verify_removal(&fact, &[repo.path().join("src")], &FsSearch::new(repo.path()));
    assert!(
        matches!(verdict, RemovalVerdict::Keep { .. }),
        "conventions require whole-repository evidence: {verdict:?}"
    );
}

#[test]
fn documented_command_replaced_by_related_successful_one() {
    let root = TempDir::new().expect("root");
    command_log::record_command_at(root.path(), "uv run pytest").expect("record");

    let verdict = review_command("pytest tests/", &LogCommandHistory::new(root.path()));
    assert_eq!(
        verdict,
        CommandVerdict::Replace {
            with: "uv run pytest".to_string()
        }
    );
}

#[test]
fn unrelated_evidence_never_touches_the_documented_command() {
    let root = TempDir::new().expect("root");
    command_log::record_command_at(root.path(), "npm run lint").expect("record");

    let verdict = review_command("pytest tests/", &LogCommandHistory::new(root.path()));
    assert_eq!(verdict, CommandVerdict::NoEvidence);
}
