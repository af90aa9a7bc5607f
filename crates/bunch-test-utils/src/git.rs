//! git2 fixtures.
//!
//! Everything here panics on failure; these are test helpers.

use std::path::Path;

/// Identity configured on every fixture repository.
pub const TEST_NAME: &str = "Test User";
pub const TEST_EMAIL: &str = "test@test.com";

/// Initialises a real git repository on branch `main` with a configured
/// identity and no commits.
///
/// # Panics
/// Panics if `git2::Repository::init` or the config writes fail.
pub fn real_git_repo(path: &Path) -> git2::Repository {
    let mut opts = git2::RepositoryInitOptions::new();
    opts.initial_head("main");
    let repo = git2::Repository::init_opts(path, &opts).unwrap_or_else(|e| {
        panic!(
            "real_git_repo: failed to init repository at {}: {e}",
            path.display()
        )
    });

    {
        let mut config = repo
            .config()
            .unwrap_or_else(|e| panic!("real_git_repo: failed to open config: {e}"));
        config.set_str("user.name", TEST_NAME).unwrap();
        config.set_str("user.email", TEST_EMAIL).unwrap();
        config.set_bool("commit.gpgsign", false).unwrap();
    }

    repo
}

/// Stage every change in the working tree, deletions included, and commit
/// on HEAD as `author`. Returns the new commit hash.
///
/// # Panics
/// Panics if any git operation fails.
pub fn commit_all_as(repo: &git2::Repository, message: &str, author: &git2::Signature<'_>) -> String {
    let mut index = repo.index().unwrap();
    index
        .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
        .unwrap();
    index.update_all(["*"].iter(), None).unwrap();
    index.write().unwrap();

    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    let committer = repo
        .signature()
        .unwrap_or_else(|_| git2::Signature::now(TEST_NAME, TEST_EMAIL).unwrap());
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

    repo.commit(Some("HEAD"), author, &committer, message, &tree, &parents)
        .unwrap_or_else(|e| panic!("commit_all_as: commit '{message}' failed: {e}"))
        .to_string()
}

/// [`commit_all_as`] with the configured test identity.
pub fn commit_all(repo: &git2::Repository, message: &str) -> String {
    let author = git2::Signature::now(TEST_NAME, TEST_EMAIL).unwrap();
    commit_all_as(repo, message, &author)
}
