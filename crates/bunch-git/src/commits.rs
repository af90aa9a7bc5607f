//! Commit history extraction with per-file actions.

use git2::{Commit, Delta, DiffOptions, Oid, Repository, Tree};

use crate::helpers::from_git_signature;
use crate::{ChangeKind, CommitInfo, FileAction, Result};

/// Build a [`CommitInfo`] for `commit`, diffing it against its first parent.
///
/// Root commits are diffed against the empty tree, so every file is an add.
pub fn read_commit(repo: &Repository, commit: &Commit<'_>) -> Result<CommitInfo> {
    let message = commit.message().unwrap_or("").to_string();
    let title = message.lines().next().unwrap_or("").to_string();

    Ok(CommitInfo {
        hash: commit.id().to_string(),
        parents: commit.parent_ids().map(|id| id.to_string()).collect(),
        author: from_git_signature(&commit.author()),
        committer: from_git_signature(&commit.committer()),
        title,
        message,
        file_actions: file_actions(repo, commit)?,
    })
}

/// File actions of `commit` against its first parent.
pub fn file_actions(repo: &Repository, commit: &Commit<'_>) -> Result<Vec<FileAction>> {
    let new_tree = commit.tree()?;
    let old_tree: Option<Tree<'_>> = match commit.parent(0) {
        Ok(parent) => Some(parent.tree()?),
        Err(_) => None,
    };

    let mut opts = DiffOptions::new();
    opts.ignore_submodules(true);
    let mut diff = repo.diff_tree_to_tree(old_tree.as_ref(), Some(&new_tree), Some(&mut opts))?;
    diff.find_similar(None)?;

    let mut actions = Vec::new();
    for delta in diff.deltas() {
        let old = delta.old_file();
        let new = delta.new_file();
        if is_submodule(old.mode()) || is_submodule(new.mode()) {
            continue;
        }

        let new_path = new.path().map(|p| p.to_string_lossy().replace('\\', "/"));
        let old_path = old.path().map(|p| p.to_string_lossy().replace('\\', "/"));

        match delta.status() {
            Delta::Added | Delta::Copied => {
                if let Some(path) = new_path {
                    actions.push(FileAction::new(
                        ChangeKind::Add,
                        path,
                        blob_text(repo, new.id())?,
                    ));
                }
            }
            Delta::Deleted => {
                if let Some(path) = old_path {
                    actions.push(FileAction::new(ChangeKind::Remove, path, ""));
                }
            }
            Delta::Modified | Delta::Typechange => {
                if let Some(path) = new_path {
                    actions.push(FileAction::new(
                        ChangeKind::Modify,
                        path,
                        blob_text(repo, new.id())?,
                    ));
                }
            }
            Delta::Renamed => {
                if let Some(path) = old_path {
                    actions.push(FileAction::new(ChangeKind::Remove, path, ""));
                }
                if let Some(path) = new_path {
                    actions.push(FileAction::new(
                        ChangeKind::Add,
                        path,
                        blob_text(repo, new.id())?,
                    ));
                }
            }
            other => {
                tracing::trace!(status = ?other, "Ignoring delta");
            }
        }
    }

    Ok(actions)
}

fn is_submodule(mode: git2::FileMode) -> bool {
    mode == git2::FileMode::Commit
}

fn blob_text(repo: &Repository, id: Oid) -> Result<String> {
    if id.is_zero() {
        return Ok(String::new());
    }
    let blob = repo.find_blob(id)?;
    Ok(String::from_utf8_lossy(blob.content()).into_owned())
}
