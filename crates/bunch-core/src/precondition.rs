//! Repository-state checks shared by mutating operations.

use bunch_fs::BunchPath;
use bunch_git::{RepositoryService, TreeStatus};

use crate::titles::{BACKUP_TITLE, SwitchTitlePattern};
use crate::{Error, Result};

/// Default number of first-parent commits inspected for unresolved switches.
pub const DEFAULT_HISTORY_WINDOW: usize = 20;

/// The working tree root must hold `.git`.
pub fn ensure_repository(repo: &dyn RepositoryService) -> Result<()> {
    let root = repo.workdir();
    if !root.join(BunchPath::GitDir.as_str()).exists() {
        return Err(bunch_git::Error::NotARepository {
            path: root.to_native(),
        }
        .into());
    }
    Ok(())
}

/// Tracked files must have no uncommitted changes.
pub fn ensure_clean(repo: &dyn RepositoryService) -> Result<()> {
    match repo.working_tree_status()? {
        TreeStatus::Clean => Ok(()),
        TreeStatus::Dirty(paths) => Err(Error::DirtyWorkingTree { paths }),
    }
}

/// No switch or backup commit may appear among the last `window` commits.
///
/// A switch leaves variant content in base files; switching again on top of
/// it would back up that content as if it were the origin.
pub fn ensure_no_unresolved_switch(
    repo: &dyn RepositoryService,
    template: &str,
    window: usize,
) -> Result<()> {
    let pattern = SwitchTitlePattern::new(template);
    let found = repo
        .recent_commits(Some(window))?
        .into_iter()
        .find(|c| pattern.matches(&c.title) || c.title.trim() == BACKUP_TITLE);

    match found {
        Some(commit) => Err(Error::UnresolvedSwitch {
            hash: commit.hash,
            title: commit.title,
        }),
        None => Ok(()),
    }
}
