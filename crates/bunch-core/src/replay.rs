//! Replaying commit ranges between base files and bunch files.
//!
//! `apply` folds a commit made on bunch files back into base files (the
//! un-bunch direction); `cp` copies a commit's changes into bunch files of
//! one suffix. Both read `until..since` and replay oldest first.

use std::collections::HashSet;

use serde::Serialize;

use bunch_fs::NormalizedPath;
use bunch_git::{
    ChangeKind, CommitInfo, CommitOptions, CommitSummary, FileAction, FileChange,
    RepositoryService,
};

use crate::Result;
use crate::chain::read_extensions;

/// Outcome of replaying a commit range.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplayReport {
    /// Source commit hash and the commit created for it, oldest first
    pub replayed: Vec<ReplayedCommit>,
    /// Source commits that produced no change
    pub skipped: Vec<CommitSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplayedCommit {
    pub source: String,
    pub hash: String,
    pub title: String,
}

impl ReplayReport {
    pub(crate) fn record(&mut self, source: &CommitInfo, created: Option<String>, title: &str) {
        match created {
            Some(hash) => self.replayed.push(ReplayedCommit {
                source: source.hash.clone(),
                hash,
                title: title.to_string(),
            }),
            None => {
                tracing::warn!(source = %source.short_hash(), title = %source.title, "Replay produced no changes, skipped");
                self.skipped.push(CommitSummary {
                    hash: source.hash.clone(),
                    title: source.title.clone(),
                });
            }
        }
    }
}

/// Message of a replayed commit: `<prefix>: <title>`, the original body and
/// trailers naming the source commit and suffix.
pub fn replayed_message(prefix: &str, commit: &CommitInfo, suffix: &str) -> String {
    let mut message = format!("{prefix}: {}\n\n", commit.title);
    let body = commit.body();
    if !body.is_empty() {
        message.push_str(body);
        message.push_str("\n\n");
    }
    message.push_str(&format!("Bunch-Source: {}\nBunch-Suffix: {suffix}\n", commit.hash));
    message
}

/// Write one action to `path` under `root`: content for adds and modifies,
/// deletion for removes.
pub(crate) fn materialize(
    root: &NormalizedPath,
    kind: ChangeKind,
    path: &str,
    content: &str,
) -> Result<FileChange> {
    let target = root.join(path);
    match kind {
        ChangeKind::Add | ChangeKind::Modify => bunch_fs::io::write_text(&target, content)?,
        ChangeKind::Remove => bunch_fs::io::remove_file(&target)?,
    }
    tracing::debug!(kind = %kind, path, "Materialized action");
    Ok(FileChange::new(kind, NormalizedPath::new(path)))
}

/// The last extension of a repository path, if any.
pub(crate) fn path_extension(path: &str) -> Option<&str> {
    let name = path.rsplit('/').next()?;
    let idx = name.rfind('.')?;
    (idx > 0 && idx + 1 < name.len()).then(|| &name[idx + 1..])
}

/// Actions of `commit` mapped onto base files for `suffix`.
///
/// Actions on other known suffixes are dropped. Actions on `.suffix` files
/// are moved to their base path, an emptied bunch file becoming a removal,
/// and win over a base action on the same path.
pub fn unbunch_actions(commit: &CommitInfo, extensions: &[String], suffix: &str) -> Vec<FileAction> {
    let is_other = |path: &str| {
        path_extension(path).is_some_and(|ext| ext != suffix && extensions.iter().any(|e| e == ext))
    };

    let (suffixed, base): (Vec<&FileAction>, Vec<&FileAction>) = commit
        .file_actions
        .iter()
        .filter(|a| !is_other(&a.path))
        .partition(|a| path_extension(&a.path) == Some(suffix));

    let mut result: Vec<FileAction> = suffixed
        .into_iter()
        .map(|a| {
            let kind = if a.kind != ChangeKind::Remove && a.content.trim().is_empty() {
                ChangeKind::Remove
            } else {
                a.kind
            };
            let base_path = &a.path[..a.path.len() - suffix.len() - 1];
            FileAction::new(kind, base_path, a.content.clone())
        })
        .collect();

    let covered: HashSet<String> = result.iter().map(|a| a.path.clone()).collect();
    result.extend(
        base.into_iter()
            .filter(|a| !covered.contains(&a.path))
            .cloned(),
    );
    result
}

/// Fold the commits of `until..since` back into base files for `suffix`,
/// committing each with its original message.
pub fn apply(
    repo: &dyn RepositoryService,
    since: &str,
    until: &str,
    suffix: &str,
    no_verify: bool,
) -> Result<ReplayReport> {
    let root = repo.workdir().clone();
    let extensions = read_extensions(&root)?;
    let commits = repo.list_commits(since, until)?;

    let mut report = ReplayReport::default();
    for commit in commits.iter().rev() {
        tracing::info!(hash = %commit.short_hash(), title = %commit.title, "Apply");
        let mut changes = Vec::new();
        for action in unbunch_actions(commit, &extensions, suffix) {
            changes.push(materialize(&root, action.kind, &action.path, &action.content)?);
        }

        let options = CommitOptions {
            no_verify,
            author: None,
        };
        let created = if changes.is_empty() {
            None
        } else {
            repo.stage_and_commit(&changes, &commit.message, &options)?
        };
        report.record(commit, created, &commit.title);
    }
    Ok(report)
}

/// Copy the commits of `until..since` into `.suffix` bunch files, keeping
/// the original authors. A removal becomes an empty bunch file.
pub fn cherry_pick(
    repo: &dyn RepositoryService,
    since: &str,
    until: &str,
    suffix: &str,
    no_verify: bool,
) -> Result<ReplayReport> {
    let root = repo.workdir().clone();
    let commits = repo.list_commits(since, until)?;

    let mut report = ReplayReport::default();
    for commit in commits.iter().rev() {
        tracing::info!(hash = %commit.short_hash(), title = %commit.title, "Cherry-pick");
        let mut changes = Vec::new();
        for action in &commit.file_actions {
            let path = format!("{}.{suffix}", action.path);
            let kind = if root.join(&path).is_file() {
                ChangeKind::Modify
            } else {
                ChangeKind::Add
            };
            changes.push(materialize(&root, kind, &path, &action.content)?);
        }

        let message = replayed_message(suffix, commit, suffix);
        let options = CommitOptions {
            no_verify,
            author: Some(commit.author.clone()),
        };
        let created = if changes.is_empty() {
            None
        } else {
            repo.stage_and_commit(&changes, &message, &options)?
        };
        report.record(commit, created, &format!("{suffix}: {}", commit.title));
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bunch_git::Signature;
    use chrono::{FixedOffset, TimeZone};
    use pretty_assertions::assert_eq;

    fn commit(actions: Vec<FileAction>) -> CommitInfo {
        let when = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2021, 5, 6, 7, 8, 9)
            .unwrap();
        let sig = Signature {
            name: "A".into(),
            email: "a@a".into(),
            when,
        };
        CommitInfo {
            hash: "0123456789abcdef".into(),
            parents: vec![],
            author: sig.clone(),
            committer: sig,
            title: "Fix thing".into(),
            message: "Fix thing\n\nLonger text".into(),
            file_actions: actions,
        }
    }

    #[test]
    fn test_unbunch_suffixed_wins_over_base() {
        let exts = vec!["193".to_string(), "192".to_string(), "as32".to_string()];
        let c = commit(vec![
            FileAction::new(ChangeKind::Modify, "a.kt", "base edit"),
            FileAction::new(ChangeKind::Modify, "a.kt.192", "variant edit"),
            FileAction::new(ChangeKind::Modify, "a.kt.as32", "other"),
            FileAction::new(ChangeKind::Add, "b.kt", "new"),
        ]);

        let mut actions = unbunch_actions(&c, &exts, "192");
        actions.sort_by(|a, b| a.path.cmp(&b.path));
        assert_eq!(
            actions,
            vec![
                FileAction::new(ChangeKind::Modify, "a.kt", "variant edit"),
                FileAction::new(ChangeKind::Add, "b.kt", "new"),
            ]
        );
    }

    #[test]
    fn test_unbunch_empty_variant_becomes_remove() {
        let exts = vec!["192".to_string()];
        let c = commit(vec![FileAction::new(ChangeKind::Modify, "dir/a.kt.192", " \n")]);
        let actions = unbunch_actions(&c, &exts, "192");
        assert_eq!(actions[0].kind, ChangeKind::Remove);
        assert_eq!(actions[0].path, "dir/a.kt");
    }

    #[test]
    fn test_replayed_message_layout() {
        let c = commit(vec![]);
        assert_eq!(
            replayed_message("changes in 192", &c, "192"),
            "changes in 192: Fix thing\n\nLonger text\n\nBunch-Source: 0123456789abcdef\nBunch-Suffix: 192\n"
        );
    }

    #[test]
    fn test_path_extension() {
        assert_eq!(path_extension("a/b.kt.192"), Some("192"));
        assert_eq!(path_extension("a.b/c"), None);
        assert_eq!(path_extension(".bunch"), None);
    }
}
