//! git2-backed [`RepositoryService`].

use chrono::{DateTime, FixedOffset};
use git2::{BranchType, Repository, ResetType, Sort, StatusOptions};

use crate::commits::read_commit;
use crate::helpers::{
    default_signature, get_current_branch, head_commit, resolve_commit, to_git_signature,
};
use crate::{
    ChangeKind, CommitInfo, CommitOptions, CommitSummary, Error, FileChange, RepositoryService,
    Result, TreeStatus,
};
use bunch_fs::{BunchPath, NormalizedPath};

/// A non-bare git repository opened at its working-tree root.
pub struct GitRepository {
    root: NormalizedPath,
    repo: Repository,
}

impl GitRepository {
    /// Open the repository whose working tree is rooted at `root`.
    pub fn open(root: impl Into<NormalizedPath>) -> Result<Self> {
        let root: NormalizedPath = root.into();
        if !root.join(BunchPath::GitDir.as_str()).exists() {
            return Err(Error::NotARepository {
                path: root.to_native(),
            });
        }

        let root = NormalizedPath::canonical(root.to_native())?;
        let repo = Repository::open(root.to_native())?;
        if repo.is_bare() || repo.workdir().is_none() {
            return Err(Error::BareRepository {
                path: root.to_native(),
            });
        }

        tracing::debug!(root = %root, "Opened repository");
        Ok(Self { root, repo })
    }
}

impl std::fmt::Debug for GitRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitRepository")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl RepositoryService for GitRepository {
    fn workdir(&self) -> &NormalizedPath {
        &self.root
    }

    fn resolve(&self, rev: &str) -> Result<String> {
        Ok(resolve_commit(&self.repo, rev)?.id().to_string())
    }

    fn list_commits(&self, since: &str, until: &str) -> Result<Vec<CommitInfo>> {
        let newest = resolve_commit(&self.repo, since)?;
        let boundary = resolve_commit(&self.repo, until)?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(newest.id())?;
        revwalk.hide(boundary.id())?;

        let mut commits = Vec::new();
        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            commits.push(read_commit(&self.repo, &commit)?);
        }

        tracing::debug!(since, until, count = commits.len(), "Listed commits");
        Ok(commits)
    }

    fn recent_commits(&self, max_count: Option<usize>) -> Result<Vec<CommitSummary>> {
        let Some(head) = head_commit(&self.repo)? else {
            return Ok(Vec::new());
        };

        let mut revwalk = self.repo.revwalk()?;
        revwalk.push(head.id())?;
        revwalk.simplify_first_parent()?;

        let mut commits = Vec::new();
        for oid in revwalk.take(max_count.unwrap_or(usize::MAX)) {
            let commit = self.repo.find_commit(oid?)?;
            commits.push(CommitSummary {
                hash: commit.id().to_string(),
                title: commit.summary().unwrap_or("").to_string(),
            });
        }
        Ok(commits)
    }

    fn history(
        &self,
        after: Option<DateTime<FixedOffset>>,
        max_count: Option<usize>,
    ) -> Result<Vec<CommitInfo>> {
        let Some(head) = head_commit(&self.repo)? else {
            return Ok(Vec::new());
        };

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(head.id())?;

        let after = after.map(|when| when.timestamp());
        let mut commits = Vec::new();
        for oid in revwalk {
            if max_count.is_some_and(|max| commits.len() >= max) {
                break;
            }
            let commit = self.repo.find_commit(oid?)?;
            if after.is_some_and(|after| commit.time().seconds() < after) {
                continue;
            }
            commits.push(read_commit(&self.repo, &commit)?);
        }

        tracing::debug!(count = commits.len(), "Read history");
        Ok(commits)
    }

    fn current_branch(&self) -> Result<String> {
        Ok(get_current_branch(&self.repo)?.unwrap_or_else(|| "HEAD".to_string()))
    }

    fn create_branch(&self, name: &str, at: &str) -> Result<()> {
        if self.repo.find_branch(name, BranchType::Local).is_ok() {
            return Err(Error::BranchExists {
                name: name.to_string(),
            });
        }
        let target = resolve_commit(&self.repo, at)?;
        self.repo.branch(name, &target, false)?;
        tracing::info!(branch = name, at = %target.id(), "Created branch");
        Ok(())
    }

    fn hard_reset(&self, rev: &str) -> Result<()> {
        let target = resolve_commit(&self.repo, rev)?;
        self.repo.reset(target.as_object(), ResetType::Hard, None)?;
        tracing::info!(to = %target.id(), "Reset working tree");
        Ok(())
    }

    fn stage_and_commit(
        &self,
        changes: &[FileChange],
        message: &str,
        options: &CommitOptions,
    ) -> Result<Option<String>> {
        let mut index = self.repo.index()?;
        for change in changes {
            let relative = change.path.to_native();
            let on_disk = self.root.join(change.path.as_str()).is_file();
            if change.kind == ChangeKind::Remove || !on_disk {
                index.remove_path(&relative)?;
            } else {
                index.add_path(&relative)?;
            }
        }
        index.write()?;

        let tree_id = index.write_tree()?;
        let parent = head_commit(&self.repo)?;
        if let Some(parent) = &parent {
            if parent.tree_id() == tree_id {
                tracing::debug!(message, "Nothing staged, skipping commit");
                return Ok(None);
            }
        }

        let tree = self.repo.find_tree(tree_id)?;
        let committer = default_signature(&self.repo)?;
        let author = match &options.author {
            Some(author) => to_git_signature(author)?,
            None => committer.clone(),
        };
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
        let oid = self
            .repo
            .commit(Some("HEAD"), &author, &committer, message, &tree, &parents)?;

        tracing::info!(
            hash = %oid,
            title = message.lines().next().unwrap_or(""),
            files = changes.len(),
            "Committed"
        );
        Ok(Some(oid.to_string()))
    }

    fn working_tree_status(&self) -> Result<TreeStatus> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(false)
            .include_ignored(false)
            .exclude_submodules(true);

        let statuses = self.repo.statuses(Some(&mut opts))?;
        let mut dirty: Vec<String> = statuses
            .iter()
            .filter(|entry| {
                let status = entry.status();
                !status.is_empty() && !status.is_ignored() && !status.is_wt_new()
            })
            .filter_map(|entry| entry.path().map(str::to_string))
            .collect();

        if dirty.is_empty() {
            Ok(TreeStatus::Clean)
        } else {
            dirty.sort();
            Ok(TreeStatus::Dirty(dirty))
        }
    }
}
