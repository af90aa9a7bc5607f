//! Detection of commits that edited a base file but forgot its bunch files.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use bunch_fs::{NormalizedPath, is_tombstone};
use bunch_git::{ChangeKind, CommitInfo, CommitSummary, RepositoryService};

use crate::Result;
use crate::chain::read_extensions;
use crate::replay::path_extension;

/// A bunch file that probably needed the same edit as its base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForgottenFile {
    pub path: String,
    /// The bunch file on disk is a tombstone
    pub deleted: bool,
}

impl std::fmt::Display for ForgottenFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.deleted {
            write!(f, "{} [deleted]", self.path)
        } else {
            write!(f, "{}", self.path)
        }
    }
}

/// A commit with at least one forgotten bunch file.
#[derive(Debug, Clone, Serialize)]
pub struct ProblemCommit {
    pub hash: String,
    pub author: String,
    pub title: String,
    pub files: Vec<ForgottenFile>,
}

/// Result of checking a commit range.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckReport {
    /// Every commit inspected, most recent first
    pub checked: Vec<CommitSummary>,
    pub problems: Vec<ProblemCommit>,
}

impl CheckReport {
    /// No commit forgot a bunch file.
    pub fn is_ok(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Check commits ordered most recent first against bunch files on disk.
///
/// For each added, modified or removed path without a bunch suffix, every
/// `<path>.<ext>` is a candidate. A candidate is forgotten when the same commit did not touch
/// it, it exists under `root`, and no more recent commit in the list added
/// it.
pub fn check_commits(
    commits: &[CommitInfo],
    extensions: &[String],
    root: &NormalizedPath,
) -> Result<CheckReport> {
    let is_bunch_path =
        |path: &str| path_extension(path).is_some_and(|ext| extensions.iter().any(|e| e == ext));

    // Index of the most recent commit adding each bunch file
    let mut latest_add: HashMap<&str, usize> = HashMap::new();
    for (index, commit) in commits.iter().enumerate() {
        for action in &commit.file_actions {
            if action.kind == ChangeKind::Add && is_bunch_path(&action.path) {
                latest_add.entry(action.path.as_str()).or_insert(index);
            }
        }
    }

    let mut report = CheckReport::default();
    let mut deleted_cache: HashMap<String, bool> = HashMap::new();

    for (index, commit) in commits.iter().enumerate() {
        report.checked.push(CommitSummary {
            hash: commit.hash.clone(),
            title: commit.title.clone(),
        });

        let touched: HashSet<&str> = commit.file_actions.iter().map(|a| a.path.as_str()).collect();
        let mut files = Vec::new();

        for action in &commit.file_actions {
            if is_bunch_path(&action.path) {
                continue;
            }
            for ext in extensions {
                let candidate = format!("{}.{ext}", action.path);
                if touched.contains(candidate.as_str()) {
                    continue;
                }
                let on_disk = root.join(&candidate);
                if !on_disk.is_file() {
                    continue;
                }
                if latest_add
                    .get(candidate.as_str())
                    .is_some_and(|&added| added < index)
                {
                    continue;
                }

                let deleted = match deleted_cache.get(&candidate) {
                    Some(&deleted) => deleted,
                    None => {
                        let deleted = is_tombstone(&on_disk)?;
                        deleted_cache.insert(candidate.clone(), deleted);
                        deleted
                    }
                };
                tracing::debug!(commit = %commit.short_hash(), path = %candidate, deleted, "Forgotten bunch file");
                files.push(ForgottenFile {
                    path: candidate,
                    deleted,
                });
            }
        }

        if !files.is_empty() {
            report.problems.push(ProblemCommit {
                hash: commit.hash.clone(),
                author: commit.author_label(),
                title: commit.title.clone(),
                files,
            });
        }
    }

    tracing::info!(
        checked = report.checked.len(),
        problems = report.problems.len(),
        "Check finished"
    );
    Ok(report)
}

/// Check `until..since`, using the rule file's extensions when none are given.
pub fn check(
    repo: &dyn RepositoryService,
    since: &str,
    until: &str,
    extensions: Option<Vec<String>>,
) -> Result<CheckReport> {
    let root = repo.workdir().clone();
    let extensions = match extensions {
        Some(extensions) if !extensions.is_empty() => extensions,
        _ => read_extensions(&root)?,
    };
    let commits = repo.list_commits(since, until)?;
    check_commits(&commits, &extensions, &root)
}
