//! Tests for the git2-backed repository service

use bunch_fs::NormalizedPath;
use bunch_git::{
    ChangeKind, CommitOptions, Error, FileAction, FileChange, GitRepository, RepositoryService,
    Signature, TreeStatus,
};
use bunch_test_utils::repo::TestRepo;
use chrono::{FixedOffset, TimeZone};
use pretty_assertions::assert_eq;
use rstest::rstest;
use tempfile::TempDir;

fn open(repo: &TestRepo) -> GitRepository {
    GitRepository::open(repo.root()).unwrap()
}

fn change(kind: ChangeKind, path: &str) -> FileChange {
    FileChange::new(kind, NormalizedPath::new(path))
}

#[test]
fn test_open_rejects_plain_directory() {
    let temp = TempDir::new().unwrap();
    let err = GitRepository::open(temp.path()).err().unwrap();
    assert!(matches!(err, Error::NotARepository { .. }));
}

#[test]
fn test_workdir_is_canonical_root() {
    let repo = TestRepo::new();
    let service = open(&repo);
    let expected = NormalizedPath::canonical(repo.root()).unwrap();
    assert_eq!(service.workdir(), &expected);
}

#[test]
fn test_debug_shows_root() {
    let repo = TestRepo::new();
    let service = open(&repo);
    let shown = format!("{service:?}");
    assert!(shown.starts_with("GitRepository"));
    assert!(shown.contains(service.workdir().as_str()));
}

#[test]
fn test_resolve_unknown_revision() {
    let repo = TestRepo::new();
    repo.write("a.txt", "A");
    repo.commit_all("first");

    let err = open(&repo).resolve("no-such-ref").unwrap_err();
    assert!(matches!(err, Error::RevisionNotFound { rev } if rev == "no-such-ref"));
}

#[test]
fn test_list_commits_newest_first_with_actions() {
    let repo = TestRepo::new();
    repo.write("a.txt", "A");
    let base = repo.commit_all("base");
    repo.write("a.txt", "A2");
    repo.write("b.txt", "B");
    repo.commit_all("second\n\nsecond body");
    repo.remove("a.txt");
    repo.commit_all("third");

    let commits = open(&repo).list_commits("HEAD", &base).unwrap();
    let titles: Vec<&str> = commits.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["third", "second"]);

    assert_eq!(
        commits[0].file_actions,
        vec![FileAction::new(ChangeKind::Remove, "a.txt", "")]
    );
    assert!(commits[1].has_action(ChangeKind::Modify, "a.txt"));
    assert!(commits[1].has_action(ChangeKind::Add, "b.txt"));
    assert_eq!(commits[1].body(), "second body");
}

#[test]
fn test_list_commits_empty_range() {
    let repo = TestRepo::new();
    repo.write("a.txt", "A");
    repo.commit_all("only");

    assert!(open(&repo).list_commits("HEAD", "HEAD").unwrap().is_empty());
}

#[rstest]
#[case(Some(1), vec!["c3"])]
#[case(Some(2), vec!["c3", "c2"])]
#[case(Some(10), vec!["c3", "c2", "c1"])]
#[case(None, vec!["c3", "c2", "c1"])]
fn test_recent_commits_window(#[case] window: Option<usize>, #[case] expected: Vec<&str>) {
    let repo = TestRepo::new();
    for (i, title) in ["c1", "c2", "c3"].iter().enumerate() {
        repo.write("a.txt", &i.to_string());
        repo.commit_all(title);
    }

    let titles: Vec<String> = open(&repo)
        .recent_commits(window)
        .unwrap()
        .into_iter()
        .map(|c| c.title)
        .collect();
    assert_eq!(titles, expected);
}

#[test]
fn test_recent_commits_on_empty_repository() {
    let repo = TestRepo::new();
    assert!(open(&repo).recent_commits(None).unwrap().is_empty());
}

#[test]
fn test_history_includes_root_commit_actions() {
    let repo = TestRepo::new();
    repo.write("a.txt", "A");
    repo.commit_all("c1");
    repo.write("a.txt.192", "A192");
    repo.commit_all("c2");
    repo.remove("a.txt.192");
    repo.commit_all("c3");

    let commits = open(&repo).history(None, None).unwrap();
    let titles: Vec<&str> = commits.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["c3", "c2", "c1"]);
    assert!(commits[0].has_action(ChangeKind::Remove, "a.txt.192"));
    assert!(commits[2].has_action(ChangeKind::Add, "a.txt"));

    let last_two = open(&repo).history(None, Some(2)).unwrap();
    assert_eq!(last_two.len(), 2);
    assert_eq!(last_two[0].title, "c3");
}

#[test]
fn test_history_after_filters_by_commit_time() {
    let repo = TestRepo::new();
    repo.write("a.txt", "A");
    repo.commit_all("c1");

    let past = FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2000, 1, 1, 0, 0, 0)
        .unwrap();
    let future = chrono::Utc::now().fixed_offset() + chrono::Duration::days(1);

    assert_eq!(open(&repo).history(Some(past), None).unwrap().len(), 1);
    assert!(open(&repo).history(Some(future), None).unwrap().is_empty());
}

#[test]
fn test_history_on_empty_repository() {
    let repo = TestRepo::new();
    assert!(open(&repo).history(None, Some(5)).unwrap().is_empty());
}

#[test]
fn test_stage_and_commit_adds_and_removes() {
    let repo = TestRepo::new();
    repo.write("a.txt", "A");
    repo.write("b.txt", "B");
    repo.commit_all("base");

    repo.write("a.txt", "changed");
    repo.remove("b.txt");
    repo.write("untouched.txt", "not staged");

    let service = open(&repo);
    let hash = service
        .stage_and_commit(
            &[change(ChangeKind::Modify, "a.txt"), change(ChangeKind::Remove, "b.txt")],
            "update",
            &CommitOptions::default(),
        )
        .unwrap()
        .unwrap();

    assert_eq!(hash, repo.head());
    assert_eq!(repo.changed_paths("HEAD"), vec!["a.txt", "b.txt"]);
    assert_eq!(repo.log_titles(), vec!["update", "base"]);
}

#[test]
fn test_stage_and_commit_skips_unchanged_tree() {
    let repo = TestRepo::new();
    repo.write("a.txt", "A");
    let base = repo.commit_all("base");

    let result = open(&repo)
        .stage_and_commit(
            &[change(ChangeKind::Modify, "a.txt")],
            "noop",
            &CommitOptions::default(),
        )
        .unwrap();

    assert_eq!(result, None);
    assert_eq!(repo.head(), base);
}

#[test]
fn test_stage_and_commit_keeps_given_author() {
    let repo = TestRepo::new();
    repo.write("a.txt", "A");
    repo.commit_all("base");
    repo.write("a.txt", "B");

    let when = FixedOffset::east_opt(3600)
        .unwrap()
        .with_ymd_and_hms(2020, 1, 2, 3, 4, 5)
        .unwrap();
    let author = Signature {
        name: "Original Author".to_string(),
        email: "orig@example.com".to_string(),
        when,
    };

    open(&repo)
        .stage_and_commit(
            &[change(ChangeKind::Modify, "a.txt")],
            "replayed",
            &CommitOptions::with_author(author),
        )
        .unwrap();

    assert_eq!(repo.author("HEAD"), "Original Author");
    let commits = open(&repo).list_commits("HEAD", "HEAD~1").unwrap();
    assert_eq!(commits[0].author.when, when);
    assert_eq!(commits[0].committer.name, bunch_test_utils::git::TEST_NAME);
    assert_eq!(
        commits[0].author_label(),
        format!("[Original Author ({})]", bunch_test_utils::git::TEST_NAME)
    );
}

#[test]
fn test_first_commit_in_empty_repository() {
    let repo = TestRepo::new();
    repo.write("a.txt", "A");

    let hash = open(&repo)
        .stage_and_commit(
            &[change(ChangeKind::Add, "a.txt")],
            "root",
            &CommitOptions::default(),
        )
        .unwrap();

    assert!(hash.is_some());
    assert_eq!(repo.log_titles(), vec!["root"]);
}

#[test]
fn test_working_tree_status_ignores_untracked() {
    let repo = TestRepo::new();
    repo.write("a.txt", "A");
    repo.commit_all("base");
    let service = open(&repo);

    repo.write("new.txt", "untracked");
    assert_eq!(service.working_tree_status().unwrap(), TreeStatus::Clean);

    repo.write("a.txt", "modified");
    assert_eq!(
        service.working_tree_status().unwrap(),
        TreeStatus::Dirty(vec!["a.txt".to_string()])
    );
}

#[test]
fn test_create_branch_and_hard_reset() {
    let repo = TestRepo::new();
    repo.write("a.txt", "A");
    let first = repo.commit_all("first");
    repo.write("a.txt", "B");
    repo.commit_all("second");

    let service = open(&repo);
    service.create_branch("saved", "HEAD").unwrap();
    let err = service.create_branch("saved", "HEAD").unwrap_err();
    assert!(matches!(err, Error::BranchExists { .. }));

    service.hard_reset(&first).unwrap();
    assert_eq!(repo.head(), first);
    assert_eq!(repo.read("a.txt"), "A");
    assert_eq!(service.current_branch().unwrap(), "main");
    assert_eq!(service.resolve("saved").unwrap().len(), 40);
}
