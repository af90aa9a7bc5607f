//! Switching the working tree between variant states.
//!
//! A switch backs up every affected base file to `<base>.<origin>` and then
//! replaces the base with the content of its highest-priority donor. The
//! atomic mode records everything in one commit; the incremental mode
//! commits the backup first and then one commit per donor suffix.

use std::collections::BTreeSet;

use serde::Serialize;

use bunch_fs::{IgnoreRules, NormalizedPath, TreeScanner, VariantContent, read_variant};
use bunch_git::{ChangeKind, CommitOptions, CommitSummary, FileChange, RepositoryService};

use crate::chain::ExtensionChain;
use crate::cleanup::{CleanupOptions, cleanup};
use crate::precondition::{
    DEFAULT_HISTORY_WINDOW, ensure_clean, ensure_no_unresolved_switch, ensure_repository,
};
use crate::titles::{BACKUP_TITLE, RESTORE_CLEANUP_TITLE, SWITCH_TITLE, switch_title};
use crate::{Error, Result};

/// How a switch is recorded in history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SwitchMode {
    /// One commit with every change
    #[default]
    Atomic,
    /// A backup commit, then one commit per donor suffix
    Incremental,
}

/// Options for [`switch`].
#[derive(Debug, Clone)]
pub struct SwitchOptions {
    pub mode: SwitchMode,
    /// Title template; `{target}` is replaced with the donor suffix.
    pub title_template: String,
    /// First-parent commits inspected for an unresolved switch; 0 disables
    /// the check.
    pub history_window: usize,
    /// Remove all bunch files afterwards in a separate commit.
    pub cleanup: bool,
    pub no_verify: bool,
    pub ignore: IgnoreRules,
}

impl Default for SwitchOptions {
    fn default() -> Self {
        Self {
            mode: SwitchMode::Atomic,
            title_template: SWITCH_TITLE.to_string(),
            history_window: DEFAULT_HISTORY_WINDOW,
            cleanup: false,
            no_verify: false,
            ignore: IgnoreRules::default(),
        }
    }
}

/// What a switch did.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SwitchReport {
    pub chain: Vec<String>,
    pub mode: SwitchMode,
    /// Commits created, oldest first
    pub commits: Vec<CommitSummary>,
    /// Every file change recorded, in commit order
    pub changes: Vec<FileChange>,
}

/// Switch the working tree along `chain`.
///
/// All preconditions and per-file validations run before the first file is
/// touched. A one-element chain changes nothing.
pub fn switch(
    repo: &dyn RepositoryService,
    chain: &ExtensionChain,
    options: &SwitchOptions,
) -> Result<SwitchReport> {
    let mut report = SwitchReport {
        chain: chain.as_slice().to_vec(),
        mode: options.mode,
        ..SwitchReport::default()
    };

    if chain.is_noop() {
        tracing::info!(chain = %chain, "Tree already on target suffix, nothing to switch");
    } else {
        let plan = SwitchPlan::validate(repo, chain, options)?;
        match options.mode {
            SwitchMode::Atomic => plan.run_atomic(repo, options, &mut report)?,
            SwitchMode::Incremental => plan.run_incremental(repo, options, &mut report)?,
        }
    }

    if options.cleanup {
        let cleanup_options = CleanupOptions {
            commit_title: RESTORE_CLEANUP_TITLE.to_string(),
            no_verify: options.no_verify,
            ignore: options.ignore.clone(),
            ..CleanupOptions::default()
        };
        let cleaned = cleanup(repo, &cleanup_options)?;
        if let Some(hash) = cleaned.commit {
            report.commits.push(CommitSummary {
                hash,
                title: RESTORE_CLEANUP_TITLE.to_string(),
            });
        }
        report.changes.extend(
            cleaned
                .removed
                .into_iter()
                .map(|p| FileChange::new(ChangeKind::Remove, p)),
        );
    }

    Ok(report)
}

/// [`switch`] in one commit.
pub fn switch_atomic(
    repo: &dyn RepositoryService,
    chain: &ExtensionChain,
    options: &SwitchOptions,
) -> Result<SwitchReport> {
    let options = SwitchOptions {
        mode: SwitchMode::Atomic,
        ..options.clone()
    };
    switch(repo, chain, &options)
}

/// [`switch`] with a backup commit and one commit per donor.
pub fn switch_incremental(
    repo: &dyn RepositoryService,
    chain: &ExtensionChain,
    options: &SwitchOptions,
) -> Result<SwitchReport> {
    let options = SwitchOptions {
        mode: SwitchMode::Incremental,
        ..options.clone()
    };
    switch(repo, chain, &options)
}

/// A validated switch: every affected base is known to be safe to mutate.
struct SwitchPlan<'c> {
    root: NormalizedPath,
    chain: &'c ExtensionChain,
    bases: Vec<NormalizedPath>,
}

impl<'c> SwitchPlan<'c> {
    fn validate(
        repo: &dyn RepositoryService,
        chain: &'c ExtensionChain,
        options: &SwitchOptions,
    ) -> Result<Self> {
        ensure_repository(repo)?;
        ensure_clean(repo)?;
        if options.history_window > 0 {
            ensure_no_unresolved_switch(repo, &options.title_template, options.history_window)?;
        }

        let root = repo.workdir().clone();
        let scanner = TreeScanner::new(&root, chain.donors().iter().cloned())
            .with_ignore(options.ignore.clone());

        let mut bases = BTreeSet::new();
        for variant in scanner.matches() {
            if root.join(variant.as_str()).is_dir() {
                return Err(Error::TargetIsDirectory {
                    path: variant.to_string(),
                });
            }
            if let Some(base) = variant.strip_extension() {
                bases.insert(base);
            }
        }

        if bases.is_empty() {
            return Err(Error::NoOp {
                message: format!("no files with suffixes {:?}", chain.donors()),
            });
        }

        for base in &bases {
            let backup = base.with_suffix(chain.origin());
            if root.join(backup.as_str()).exists() {
                return Err(Error::Collision {
                    path: backup.to_string(),
                });
            }
            if root.join(base.as_str()).is_dir() {
                return Err(Error::TargetIsDirectory {
                    path: base.to_string(),
                });
            }
        }

        tracing::info!(chain = %chain, bases = bases.len(), "Switch validated");
        Ok(Self {
            root,
            chain,
            bases: bases.into_iter().collect(),
        })
    }

    fn abs(&self, path: &NormalizedPath) -> NormalizedPath {
        self.root.join(path.as_str())
    }

    /// Copy the base to its backup, or leave an empty backup when the base
    /// does not exist yet. Returns whether the base existed.
    fn backup(&self, base: &NormalizedPath, changes: &mut Vec<FileChange>) -> Result<bool> {
        let backup = base.with_suffix(self.chain.origin());
        let existed = self.abs(base).is_file();
        if existed {
            bunch_fs::io::copy_file(&self.abs(base), &self.abs(&backup))?;
        } else {
            bunch_fs::io::create_empty(&self.abs(&backup))?;
        }
        tracing::debug!(base = %base, backup = %backup, existed, "Backed up base file");
        changes.push(FileChange::new(ChangeKind::Add, backup));
        Ok(existed)
    }

    /// Apply one donor file to `base`: content replaces it, a tombstone
    /// removes it. Records nothing when a tombstone meets a missing base.
    fn apply_donor(
        &self,
        base: &NormalizedPath,
        donor: &NormalizedPath,
        base_existed: bool,
        changes: &mut Vec<FileChange>,
    ) -> Result<()> {
        let base_kind = if base_existed {
            ChangeKind::Modify
        } else {
            ChangeKind::Add
        };

        match read_variant(&self.abs(donor))? {
            VariantContent::Content(_) => {
                bunch_fs::io::copy_file(&self.abs(donor), &self.abs(base))?;
                tracing::debug!(base = %base, donor = %donor, "Base replaced from donor");
                changes.push(FileChange::new(base_kind, base.clone()));
            }
            VariantContent::Tombstone if base_existed => {
                bunch_fs::io::remove_file(&self.abs(base))?;
                tracing::debug!(base = %base, donor = %donor, "Base removed by tombstone");
                changes.push(FileChange::new(ChangeKind::Remove, base.clone()));
            }
            VariantContent::Tombstone => {
                tracing::debug!(base = %base, donor = %donor, "Tombstone for absent base");
            }
        }
        Ok(())
    }

    fn commit(
        &self,
        repo: &dyn RepositoryService,
        changes: &[FileChange],
        title: String,
        options: &SwitchOptions,
        report: &mut SwitchReport,
    ) -> Result<()> {
        let commit_options = CommitOptions {
            no_verify: options.no_verify,
            author: None,
        };
        if let Some(hash) = repo.stage_and_commit(changes, &title, &commit_options)? {
            report.commits.push(CommitSummary { hash, title });
        }
        report.changes.extend_from_slice(changes);
        Ok(())
    }

    fn run_atomic(
        &self,
        repo: &dyn RepositoryService,
        options: &SwitchOptions,
        report: &mut SwitchReport,
    ) -> Result<()> {
        let mut changes = Vec::new();
        for base in &self.bases {
            // The first existing donor from the top wins, tombstone or not
            let Some(donor) = self
                .chain
                .donors()
                .iter()
                .rev()
                .map(|suffix| base.with_suffix(suffix))
                .find(|candidate| self.abs(candidate).is_file())
            else {
                tracing::warn!(base = %base, "Donor disappeared after scan, skipping");
                continue;
            };

            let existed = self.backup(base, &mut changes)?;
            if existed {
                bunch_fs::io::remove_file(&self.abs(base))?;
            }
            self.apply_donor(base, &donor, existed, &mut changes)?;
        }

        let title = switch_title(&options.title_template, self.chain.target());
        self.commit(repo, &changes, title, options, report)
    }

    fn run_incremental(
        &self,
        repo: &dyn RepositoryService,
        options: &SwitchOptions,
        report: &mut SwitchReport,
    ) -> Result<()> {
        let mut backups = Vec::new();
        for base in &self.bases {
            self.backup(base, &mut backups)?;
        }
        self.commit(repo, &backups, BACKUP_TITLE.to_string(), options, report)?;

        for suffix in self.chain.donors() {
            let mut changes = Vec::new();
            for base in &self.bases {
                let donor = base.with_suffix(suffix);
                if !self.abs(&donor).is_file() {
                    continue;
                }
                let existed = self.abs(base).is_file();
                self.apply_donor(base, &donor, existed, &mut changes)?;
            }

            if changes.is_empty() {
                tracing::debug!(suffix = %suffix, "No changes for donor, skipping commit");
                continue;
            }
            let title = switch_title(&options.title_template, suffix);
            self.commit(repo, &changes, title, options, report)?;
        }
        Ok(())
    }
}
