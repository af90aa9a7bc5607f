//! Removal of bunch files from the working tree.

use serde::Serialize;

use bunch_fs::{IgnoreRules, NormalizedPath, TreeScanner};
use bunch_git::{ChangeKind, CommitOptions, FileChange, RepositoryService};

use crate::chain::read_extensions;
use crate::titles::{CLEANUP_TITLE, cleanup_title};
use crate::{Error, Result};

/// Options for [`cleanup`].
#[derive(Debug, Clone)]
pub struct CleanupOptions {
    /// Only remove files with this suffix; every rule-file extension when `None`.
    pub extension: Option<String>,
    /// Title template; `{ext}` becomes ` <ext>` or nothing.
    pub commit_title: String,
    /// Delete files without committing.
    pub no_commit: bool,
    pub no_verify: bool,
    pub ignore: IgnoreRules,
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self {
            extension: None,
            commit_title: CLEANUP_TITLE.to_string(),
            no_commit: false,
            no_verify: false,
            ignore: IgnoreRules::default(),
        }
    }
}

/// Outcome of a cleanup.
#[derive(Debug, Clone, Serialize)]
pub struct CleanupReport {
    pub removed: Vec<NormalizedPath>,
    /// Hash of the cleanup commit, if one was created.
    pub commit: Option<String>,
}

/// Delete every bunch file under the repository root and optionally commit.
///
/// Fails before deleting anything when a matching entry is a directory.
pub fn cleanup(repo: &dyn RepositoryService, options: &CleanupOptions) -> Result<CleanupReport> {
    let root = repo.workdir();
    let extensions = match &options.extension {
        Some(ext) => vec![ext.clone()],
        None => read_extensions(root)?,
    };

    let scanner = TreeScanner::new(root, extensions).with_ignore(options.ignore.clone());
    let mut removed: Vec<NormalizedPath> = scanner.matches().collect();
    removed.sort();

    if let Some(dir) = removed.iter().find(|p| root.join(p.as_str()).is_dir()) {
        return Err(Error::TargetIsDirectory {
            path: dir.to_string(),
        });
    }

    let mut changes = Vec::with_capacity(removed.len());
    for path in &removed {
        bunch_fs::io::remove_file(&root.join(path.as_str()))?;
        tracing::debug!(path = %path, "Removed bunch file");
        changes.push(FileChange::new(ChangeKind::Remove, path.clone()));
    }

    let commit = if options.no_commit || changes.is_empty() {
        None
    } else {
        let title = cleanup_title(&options.commit_title, options.extension.as_deref());
        let commit_options = CommitOptions {
            no_verify: options.no_verify,
            author: None,
        };
        repo.stage_and_commit(&changes, &title, &commit_options)?
    };

    tracing::info!(removed = removed.len(), committed = commit.is_some(), "Cleanup finished");
    Ok(CleanupReport { removed, commit })
}
