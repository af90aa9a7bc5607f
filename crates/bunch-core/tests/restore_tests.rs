//! Tests for moving post-switch edits into bunch files

mod common;

use bunch_core::{Error, RestoreOptions, SwitchOptions, resolve_chain, restore, switch_atomic};
use bunch_fs::NormalizedPath;
use bunch_test_utils::repo::TestRepo;
use common::open;
use pretty_assertions::assert_eq;

/// A repository switched to 192 with one developer commit on top.
fn switched_with_edit() -> (TestRepo, String) {
    let repo = TestRepo::new();
    repo.rules(&["193", "192"]);
    repo.write("a.kt", "A193");
    repo.write("a.kt.192", "A192");
    repo.write("c.kt", "C");
    let init = repo.commit_all("init");

    let root = NormalizedPath::new(repo.root());
    let chain = resolve_chain(&root, "192").unwrap();
    switch_atomic(&open(&repo), &chain, &SwitchOptions::default()).unwrap();
    assert_eq!(repo.read("a.kt"), "A192");

    repo.write("a.kt", "A192 fixed");
    repo.write("c.kt", "C fixed");
    repo.commit_all_as("Fix a", "Alice", "alice@example.com");
    (repo, init)
}

#[test]
fn test_restore_finds_last_switch() {
    let (repo, init) = switched_with_edit();

    let report = restore(&open(&repo), &RestoreOptions::default()).unwrap();

    assert_eq!(report.until, init);
    assert_eq!(report.suffix, "192");
    assert_eq!(report.replay.replayed.len(), 1);
    assert_eq!(repo.read("a.kt"), "A193");
    assert_eq!(repo.read("a.kt.192"), "A192 fixed");
    assert_eq!(repo.read("c.kt"), "C fixed");
    repo.assert_file_not_exists("a.kt.193");
    assert_eq!(repo.log_titles(), vec!["changes in 192: Fix a", "init"]);
    assert_eq!(repo.author("HEAD"), "Alice");
    repo.assert_file_contains(".bunch", "193");
}

#[test]
fn test_restore_creates_backup_branch_at_old_head() {
    let (repo, _) = switched_with_edit();
    let old_head = repo.head();

    let report = restore(&open(&repo), &RestoreOptions::default()).unwrap();

    let name = "bunches_backup_branch_for_main";
    assert_eq!(report.backup_branch.as_deref(), Some(name));
    let branch = repo
        .git()
        .find_branch(name, git2::BranchType::Local)
        .unwrap();
    assert_eq!(branch.get().peel_to_commit().unwrap().id().to_string(), old_head);
}

#[test]
fn test_restore_turns_removed_base_into_tombstone() {
    let repo = TestRepo::new();
    repo.rules(&["193", "192"]);
    repo.write("a.kt", "A193");
    repo.write("a.kt.192", "A192");
    repo.write("c.kt", "C");
    repo.commit_all("init");

    let root = NormalizedPath::new(repo.root());
    let chain = resolve_chain(&root, "192").unwrap();
    switch_atomic(&open(&repo), &chain, &SwitchOptions::default()).unwrap();
    repo.remove("a.kt");
    repo.remove("c.kt");
    repo.commit_all("Drop a and c");

    let report = restore(&open(&repo), &RestoreOptions::default()).unwrap();

    assert_eq!(report.replay.replayed.len(), 1);
    assert!(report.replay.skipped.is_empty());
    assert_eq!(repo.read("a.kt"), "A193");
    assert_eq!(repo.read("a.kt.192"), "");
    repo.assert_file_not_exists("c.kt");
    repo.assert_file_not_exists("c.kt.192");
    assert!(!repo.is_dirty());
}

#[test]
fn test_restore_without_backup() {
    let (repo, _) = switched_with_edit();
    let options = RestoreOptions {
        backup: false,
        ..RestoreOptions::default()
    };

    let report = restore(&open(&repo), &options).unwrap();

    assert!(report.backup_branch.is_none());
    assert!(
        repo.git()
            .find_branch("bunches_backup_branch_for_main", git2::BranchType::Local)
            .is_err()
    );
}

#[test]
fn test_restore_all_redirects_every_base() {
    let (repo, _) = switched_with_edit();
    let options = RestoreOptions {
        all: true,
        prefix: Some("moved".to_string()),
        ..RestoreOptions::default()
    };

    restore(&open(&repo), &options).unwrap();

    assert_eq!(repo.read("c.kt"), "C");
    assert_eq!(repo.read("c.kt.192"), "C fixed");
    assert_eq!(repo.log_titles()[0], "moved: Fix a");
}

#[test]
fn test_explicit_until_requires_suffix() {
    let (repo, init) = switched_with_edit();
    let options = RestoreOptions {
        until: Some(init.clone()),
        ..RestoreOptions::default()
    };

    let err = restore(&open(&repo), &options).unwrap_err();
    assert!(matches!(err, Error::AmbiguousBoundary { ref until } if until == &init));
}

#[test]
fn test_no_switch_commit() {
    let repo = TestRepo::new();
    repo.rules(&["193", "192"]);
    repo.write("a.kt", "A");
    repo.commit_all("init");
    repo.write("a.kt", "B");
    repo.commit_all("edit");
    let head = repo.head();

    let err = restore(&open(&repo), &RestoreOptions::default()).unwrap_err();

    assert!(matches!(err, Error::NoSwitchCommit));
    assert_eq!(repo.head(), head);
}

#[test]
fn test_dirty_tree_blocks_restore() {
    let (repo, _) = switched_with_edit();
    let head = repo.head();
    repo.write("c.kt", "uncommitted");

    let err = restore(&open(&repo), &RestoreOptions::default()).unwrap_err();

    assert!(matches!(err, Error::DirtyWorkingTree { .. }));
    assert_eq!(repo.head(), head);
}
