//! Repository service trait and the commit model it exchanges.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::Result;
use bunch_fs::NormalizedPath;

/// Kind of change to a single path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Add,
    Modify,
    Remove,
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Add => "add",
            Self::Modify => "modify",
            Self::Remove => "remove",
        };
        write!(f, "{s}")
    }
}

/// A working-tree change to be staged, with a root-relative path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FileChange {
    pub kind: ChangeKind,
    pub path: NormalizedPath,
}

impl FileChange {
    pub fn new(kind: ChangeKind, path: NormalizedPath) -> Self {
        Self { kind, path }
    }
}

/// One path touched by a historical commit.
///
/// `content` is the full text of the new side; empty for removals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAction {
    pub kind: ChangeKind,
    pub path: String,
    pub content: String,
}

impl FileAction {
    pub fn new(kind: ChangeKind, path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Author or committer identity, including the original timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub email: String,
    pub when: DateTime<FixedOffset>,
}

/// A commit with its file actions against the first parent.
#[derive(Debug, Clone)]
pub struct CommitInfo {
    pub hash: String,
    pub parents: Vec<String>,
    pub author: Signature,
    pub committer: Signature,
    /// First line of the message
    pub title: String,
    /// Full message
    pub message: String,
    pub file_actions: Vec<FileAction>,
}

impl CommitInfo {
    /// Abbreviated hash for display.
    pub fn short_hash(&self) -> &str {
        &self.hash[..self.hash.len().min(7)]
    }

    /// `[author]`, or `[author (committer)]` when they differ.
    pub fn author_label(&self) -> String {
        if self.author.name == self.committer.name {
            format!("[{}]", self.author.name)
        } else {
            format!("[{} ({})]", self.author.name, self.committer.name)
        }
    }

    /// Message text after the title line, trimmed.
    pub fn body(&self) -> &str {
        self.message
            .split_once('\n')
            .map(|(_, rest)| rest.trim())
            .unwrap_or("")
    }

    /// Whether any action of `kind` touches `path`.
    pub fn has_action(&self, kind: ChangeKind, path: &str) -> bool {
        self.file_actions
            .iter()
            .any(|a| a.kind == kind && a.path == path)
    }
}

/// Hash and title of a commit, without file contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitSummary {
    pub hash: String,
    pub title: String,
}

/// Options for [`RepositoryService::stage_and_commit`].
#[derive(Debug, Clone, Default)]
pub struct CommitOptions {
    /// Skip commit hooks. libgit2 never runs hooks, so this always holds
    /// for [`crate::GitRepository`].
    pub no_verify: bool,
    /// Author to record; the repository's configured identity when `None`.
    pub author: Option<Signature>,
}

impl CommitOptions {
    pub fn with_author(author: Signature) -> Self {
        Self {
            no_verify: false,
            author: Some(author),
        }
    }
}

/// Whether the working tree has uncommitted changes to tracked files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeStatus {
    Clean,
    Dirty(Vec<String>),
}

/// Version-control operations the bunch engine depends on.
///
/// Refs are anything git can parse (`HEAD~2`, branch names, hashes).
pub trait RepositoryService {
    /// Root of the working tree; every path exchanged is relative to it.
    fn workdir(&self) -> &NormalizedPath;

    /// Resolve a ref to a full commit hash.
    fn resolve(&self, rev: &str) -> Result<String>;

    /// Commits reachable from `since` but not from `until`, most recent first.
    ///
    /// `since` is the newest commit of interest; `until` is the parent of
    /// the oldest one.
    fn list_commits(&self, since: &str, until: &str) -> Result<Vec<CommitInfo>>;

    /// Commits on HEAD's first-parent line, newest first, at most
    /// `max_count` of them; the whole line when `None`.
    ///
    /// Empty for a repository without commits.
    fn recent_commits(&self, max_count: Option<usize>) -> Result<Vec<CommitSummary>>;

    /// Commits reachable from HEAD with their file actions, newest first.
    ///
    /// Commits made before `after` (committer time) are left out; at most
    /// `max_count` are returned.
    fn history(
        &self,
        after: Option<DateTime<FixedOffset>>,
        max_count: Option<usize>,
    ) -> Result<Vec<CommitInfo>>;

    /// Name of the checked-out branch, or `HEAD` when detached.
    fn current_branch(&self) -> Result<String>;

    /// Create branch `name` pointing at `at`.
    fn create_branch(&self, name: &str, at: &str) -> Result<()>;

    /// Move the current branch to `rev` and overwrite index and working tree.
    fn hard_reset(&self, rev: &str) -> Result<()>;

    /// Stage `changes` as they are on disk and commit them on HEAD.
    ///
    /// A change whose file is gone from disk is staged as a removal. Returns
    /// the new commit hash, or `None` when the staged tree equals HEAD's and
    /// nothing was committed.
    fn stage_and_commit(
        &self,
        changes: &[FileChange],
        message: &str,
        options: &CommitOptions,
    ) -> Result<Option<String>>;

    /// Status of tracked files in the working tree.
    fn working_tree_status(&self) -> Result<TreeStatus>;
}
