//! [`TestRepo`] builder for bunch test scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::git;

/// A temporary git repository with helper methods for test setup and
/// assertion. Paths are relative to the repository root.
///
/// # Example
///
/// ```rust,no_run
/// use bunch_test_utils::repo::TestRepo;
///
/// let repo = TestRepo::new();
/// repo.rules(&["193", "192", "193_as32"]);
/// repo.write("a.txt", "A");
/// repo.write("a.txt.192", "A192");
/// repo.commit_all("initial");
/// repo.assert_file_contains("a.txt.192", "A192");
/// ```
pub struct TestRepo {
    temp_dir: TempDir,
    repo: git2::Repository,
}

impl Default for TestRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRepo {
    /// Create a repository on branch `main` with a configured identity.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let repo = git::real_git_repo(temp_dir.path());
        Self { temp_dir, repo }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The underlying git2 handle.
    pub fn git(&self) -> &git2::Repository {
        &self.repo
    }

    /// Absolute path of `rel`.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    /// Write `.bunch` with one line per entry.
    pub fn rules(&self, lines: &[&str]) {
        self.write(".bunch", &format!("{}\n", lines.join("\n")));
    }

    /// Write a file, creating parent directories.
    pub fn write(&self, rel: &str, content: &str) {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("TestRepo::write: {}: {e}", path.display()));
    }

    /// Read a file as text.
    pub fn read(&self, rel: &str) -> String {
        let path = self.path(rel);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("TestRepo::read: {}: {e}", path.display()))
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.path(rel).exists()
    }

    /// Delete a file if present.
    pub fn remove(&self, rel: &str) {
        let path = self.path(rel);
        if path.exists() {
            fs::remove_file(&path).unwrap();
        }
    }

    /// Stage everything and commit. Returns the commit hash.
    pub fn commit_all(&self, message: &str) -> String {
        git::commit_all(&self.repo, message)
    }

    /// Stage everything and commit with a specific author.
    pub fn commit_all_as(&self, message: &str, name: &str, email: &str) -> String {
        let author = git2::Signature::now(name, email).unwrap();
        git::commit_all_as(&self.repo, message, &author)
    }

    /// Hash of HEAD.
    pub fn head(&self) -> String {
        self.repo
            .head()
            .unwrap()
            .peel_to_commit()
            .unwrap()
            .id()
            .to_string()
    }

    /// Full message of the commit at `rev`.
    pub fn message(&self, rev: &str) -> String {
        let commit = self.repo.revparse_single(rev).unwrap().peel_to_commit().unwrap();
        commit.message().unwrap_or("").to_string()
    }

    /// Author name of the commit at `rev`.
    pub fn author(&self, rev: &str) -> String {
        let commit = self.repo.revparse_single(rev).unwrap().peel_to_commit().unwrap();
        commit.author().name().unwrap_or("").to_string()
    }

    /// Titles along HEAD's first-parent line, newest first. Empty before the
    /// first commit.
    pub fn log_titles(&self) -> Vec<String> {
        let Ok(head) = self.repo.head() else {
            return Vec::new();
        };
        let mut walk = self.repo.revwalk().unwrap();
        walk.push(head.peel_to_commit().unwrap().id()).unwrap();
        walk.simplify_first_parent().unwrap();
        walk.map(|oid| {
            let commit = self.repo.find_commit(oid.unwrap()).unwrap();
            commit.summary().unwrap_or("").to_string()
        })
        .collect()
    }

    /// Paths touched by the commit at `rev` relative to its first parent, sorted.
    pub fn changed_paths(&self, rev: &str) -> Vec<String> {
        let commit = self.repo.revparse_single(rev).unwrap().peel_to_commit().unwrap();
        let new_tree = commit.tree().unwrap();
        let old_tree = commit.parent(0).ok().map(|p| p.tree().unwrap());
        let diff = self
            .repo
            .diff_tree_to_tree(old_tree.as_ref(), Some(&new_tree), None)
            .unwrap();
        let mut paths: Vec<String> = diff
            .deltas()
            .filter_map(|d| {
                d.new_file()
                    .path()
                    .or_else(|| d.old_file().path())
                    .map(|p| p.to_string_lossy().replace('\\', "/"))
            })
            .collect();
        paths.sort();
        paths
    }

    /// Whether tracked files have uncommitted changes.
    pub fn is_dirty(&self) -> bool {
        let mut opts = git2::StatusOptions::new();
        opts.include_untracked(false);
        !self.repo.statuses(Some(&mut opts)).unwrap().is_empty()
    }

    /// Assert that `path` (relative to the repo root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.path(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the repo root) does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.path(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `path` (relative to root) contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, path: &str, content: &str) {
        let file_content = self.read(path);
        assert!(
            file_content.contains(content),
            "File {path} does not contain expected content.\nExpected: {content}\nActual: {file_content}"
        );
    }
}
