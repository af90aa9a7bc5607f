//! Restore: rewrite the history after a switch so that edits made on top of
//! switched base files land in the bunch files they belong to.
//!
//! The sequence is not atomic. A backup branch at the old HEAD is the only
//! way back if a replay step fails.

use serde::Serialize;

use bunch_fs::NormalizedPath;
use bunch_git::{ChangeKind, CommitOptions, RepositoryService};

use crate::chain::read_extensions;
use crate::precondition::ensure_clean;
use crate::replay::{ReplayReport, materialize, path_extension, replayed_message};
use crate::titles::{BACKUP_BRANCH_PREFIX, SWITCH_TITLE, SwitchTitlePattern};
use crate::{Error, Result};

/// Options for [`restore`].
#[derive(Debug, Clone)]
pub struct RestoreOptions {
    /// Parent of the switch commit; the last switch commit is searched when `None`.
    pub until: Option<String>,
    /// Suffix receiving the replayed edits. Required with an explicit `until`.
    pub suffix: Option<String>,
    /// Create `bunches_backup_branch_for_<branch>` at the old HEAD.
    pub backup: bool,
    /// Redirect every non-bunch path, not just bases that already have variants.
    pub all: bool,
    /// Title prefix; `changes in <suffix>` when `None`.
    pub prefix: Option<String>,
    pub title_template: String,
    pub no_verify: bool,
}

impl Default for RestoreOptions {
    fn default() -> Self {
        Self {
            until: None,
            suffix: None,
            backup: true,
            all: false,
            prefix: None,
            title_template: SWITCH_TITLE.to_string(),
            no_verify: false,
        }
    }
}

/// Outcome of a restore.
#[derive(Debug, Clone, Serialize)]
pub struct RestoreReport {
    pub until: String,
    pub suffix: String,
    pub backup_branch: Option<String>,
    #[serde(flatten)]
    pub replay: ReplayReport,
}

/// Resolve the boundary and suffix a restore works with.
fn boundary(repo: &dyn RepositoryService, options: &RestoreOptions) -> Result<(String, String)> {
    if let Some(until) = &options.until {
        let suffix = options
            .suffix
            .clone()
            .ok_or_else(|| Error::AmbiguousBoundary {
                until: until.clone(),
            })?;
        return Ok((until.clone(), suffix));
    }

    let pattern = SwitchTitlePattern::new(&options.title_template);
    let switch_commit = repo
        .recent_commits(None)?
        .into_iter()
        .find(|c| pattern.matches(&c.title))
        .ok_or(Error::NoSwitchCommit)?;

    let until = format!("{}~", switch_commit.hash);
    let suffix = match &options.suffix {
        Some(suffix) => suffix.clone(),
        None => pattern
            .target(&switch_commit.title)
            .map(str::to_string)
            .ok_or_else(|| Error::AmbiguousBoundary {
                until: until.clone(),
            })?,
    };
    tracing::info!(switch = %switch_commit.hash, suffix = %suffix, "Found switch commit");
    Ok((until, suffix))
}

/// Where a replayed action on `path` should land.
fn redirect(
    root: &NormalizedPath,
    path: &str,
    extensions: &[String],
    suffix: &str,
    all: bool,
) -> String {
    let is_bunch_file =
        path_extension(path).is_some_and(|ext| extensions.iter().any(|e| e == ext));
    if is_bunch_file {
        return path.to_string();
    }

    let has_variants = extensions
        .iter()
        .any(|ext| root.join(&format!("{path}.{ext}")).exists());
    if all || has_variants {
        format!("{path}.{suffix}")
    } else {
        path.to_string()
    }
}

/// Move the commits made after a switch into bunch files of the switched suffix.
pub fn restore(repo: &dyn RepositoryService, options: &RestoreOptions) -> Result<RestoreReport> {
    let (until, suffix) = boundary(repo, options)?;
    ensure_clean(repo)?;

    let root = repo.workdir().clone();
    let extensions = read_extensions(&root)?;
    let until_hash = repo.resolve(&until)?;

    let mut commits = repo.list_commits("HEAD", &until_hash)?;
    // The oldest commit in range is the switch itself
    commits.pop();

    let backup_branch = if options.backup {
        let name = format!("{BACKUP_BRANCH_PREFIX}{}", repo.current_branch()?);
        repo.create_branch(&name, "HEAD")?;
        Some(name)
    } else {
        None
    };

    repo.hard_reset(&until_hash)?;

    let prefix = options
        .prefix
        .clone()
        .unwrap_or_else(|| format!("changes in {suffix}"));

    let mut replay = ReplayReport::default();
    for commit in commits.iter().rev() {
        tracing::info!(hash = %commit.short_hash(), title = %commit.title, "Restore");
        let mut changes = Vec::new();
        for action in &commit.file_actions {
            let path = redirect(&root, &action.path, &extensions, &suffix, options.all);
            let removed = action.kind == ChangeKind::Remove;
            let kind = match action.kind {
                ChangeKind::Remove if path == action.path => ChangeKind::Remove,
                _ if root.join(&path).is_file() => ChangeKind::Modify,
                _ => ChangeKind::Add,
            };
            // A removal redirected into a bunch file leaves a tombstone
            let content = if removed { "" } else { action.content.as_str() };
            changes.push(materialize(&root, kind, &path, content)?);
        }

        let message = replayed_message(&prefix, commit, &suffix);
        let commit_options = CommitOptions {
            no_verify: options.no_verify,
            author: Some(commit.author.clone()),
        };
        let created = if changes.is_empty() {
            None
        } else {
            repo.stage_and_commit(&changes, &message, &commit_options)?
        };
        replay.record(commit, created, &format!("{prefix}: {}", commit.title));
    }

    Ok(RestoreReport {
        until: until_hash,
        suffix,
        backup_branch,
        replay,
    })
}
