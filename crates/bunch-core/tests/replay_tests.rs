//! Tests for apply and cp

mod common;

use bunch_core::{apply, cherry_pick};
use bunch_test_utils::repo::TestRepo;
use common::open;
use pretty_assertions::assert_eq;

fn setup() -> TestRepo {
    let repo = TestRepo::new();
    repo.rules(&["193", "192", "as32"]);
    repo.write("src/a.kt", "A");
    repo.write("src/a.kt.192", "A192");
    repo.commit_all("init");
    repo
}

#[test]
fn test_cp_copies_changes_into_bunch_files() {
    let repo = setup();
    repo.write("src/a.kt", "A fixed");
    repo.write("src/b.kt", "B");
    let source = repo.commit_all_as("Fix bug\n\nDetails here", "Alice", "alice@example.com");

    let report = cherry_pick(&open(&repo), "HEAD", "HEAD~1", "as32", false).unwrap();

    assert_eq!(report.replayed.len(), 1);
    assert_eq!(report.replayed[0].source, source);
    assert_eq!(repo.read("src/a.kt.as32"), "A fixed");
    assert_eq!(repo.read("src/b.kt.as32"), "B");
    assert_eq!(repo.author("HEAD"), "Alice");
    assert_eq!(
        repo.message("HEAD"),
        format!("as32: Fix bug\n\nDetails here\n\nBunch-Source: {source}\nBunch-Suffix: as32\n")
    );
    assert_eq!(repo.changed_paths("HEAD"), vec!["src/a.kt.as32", "src/b.kt.as32"]);
}

#[test]
fn test_cp_turns_removal_into_tombstone() {
    let repo = setup();
    repo.remove("src/a.kt");
    repo.commit_all("Drop a");

    cherry_pick(&open(&repo), "HEAD", "HEAD~1", "as32", false).unwrap();

    assert_eq!(repo.read("src/a.kt.as32"), "");
    assert_eq!(repo.log_titles()[0], "as32: Drop a");
}

#[test]
fn test_cp_replays_oldest_first() {
    let repo = setup();
    let base = repo.head();
    repo.write("src/a.kt", "one");
    repo.commit_all("first");
    repo.write("src/a.kt", "two");
    repo.commit_all("second");

    let report = cherry_pick(&open(&repo), "HEAD", &base, "192", false).unwrap();

    let titles: Vec<&str> = report.replayed.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["192: first", "192: second"]);
    assert_eq!(repo.read("src/a.kt.192"), "two");
}

#[test]
fn test_apply_folds_bunch_edit_into_base() {
    let repo = setup();
    repo.write("src/a.kt.192", "A192 fixed");
    repo.commit_all("Tweak 192\n\nKeep this body");

    let report = apply(&open(&repo), "HEAD", "HEAD~1", "192", false).unwrap();

    assert_eq!(report.replayed.len(), 1);
    assert_eq!(repo.read("src/a.kt"), "A192 fixed");
    assert_eq!(repo.message("HEAD"), "Tweak 192\n\nKeep this body");
    assert_eq!(repo.changed_paths("HEAD"), vec!["src/a.kt"]);
}

#[test]
fn test_apply_empty_bunch_file_removes_base() {
    let repo = setup();
    repo.write("src/a.kt.192", "\n");
    repo.commit_all("Delete for 192");

    apply(&open(&repo), "HEAD", "HEAD~1", "192", false).unwrap();

    repo.assert_file_not_exists("src/a.kt");
}

#[test]
fn test_apply_skips_commit_on_other_suffix() {
    let repo = setup();
    repo.write("src/a.kt.as32", "only as32");
    repo.commit_all("as32 only");
    let head = repo.head();

    let report = apply(&open(&repo), "HEAD", "HEAD~1", "192", false).unwrap();

    assert!(report.replayed.is_empty());
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].title, "as32 only");
    assert_eq!(repo.head(), head);
}
