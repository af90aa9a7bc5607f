//! Finding bunch files that repeat the content they would inherit anyway.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use bunch_fs::{IgnoreRules, NormalizedPath, TreeScanner, read_variant};
use bunch_git::{ChangeKind, CommitOptions, FileChange, RepositoryService};

use crate::chain::{ExtensionChain, RuleFile};
use crate::titles::REDUCE_TITLE;
use crate::{Error, Result};

/// What to do with redundant files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReduceAction {
    /// Report only
    #[default]
    Print,
    /// Delete without committing
    Delete,
    /// Delete and commit
    Commit,
}

/// Options for [`reduce`].
#[derive(Debug, Clone)]
pub struct ReduceOptions {
    pub action: ReduceAction,
    pub commit_title: String,
    pub no_verify: bool,
    pub ignore: IgnoreRules,
}

impl Default for ReduceOptions {
    fn default() -> Self {
        Self {
            action: ReduceAction::Print,
            commit_title: REDUCE_TITLE.to_string(),
            no_verify: false,
            ignore: IgnoreRules::default(),
        }
    }
}

/// A bunch file equal, ignoring whitespace, to its predecessor in a chain.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct RedundantFile {
    pub path: NormalizedPath,
    /// The predecessor it duplicates
    pub same_as: NormalizedPath,
}

/// Outcome of a reduce run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReduceReport {
    pub action: ReduceAction,
    /// Sorted by path, each path once
    pub redundant: Vec<RedundantFile>,
    pub commit: Option<String>,
}

/// Whitespace-insensitive content comparison with caching.
struct Comparator<'r> {
    root: &'r NormalizedPath,
    content: HashMap<NormalizedPath, String>,
    verdicts: HashMap<(NormalizedPath, NormalizedPath), bool>,
}

impl<'r> Comparator<'r> {
    fn new(root: &'r NormalizedPath) -> Self {
        Self {
            root,
            content: HashMap::new(),
            verdicts: HashMap::new(),
        }
    }

    fn normalized(&mut self, path: &NormalizedPath) -> Result<&str> {
        if !self.content.contains_key(path) {
            let text = read_variant(&self.root.join(path.as_str()))?.normalized();
            self.content.insert(path.clone(), text);
        }
        Ok(self.content.get(path).map(String::as_str).unwrap_or_default())
    }

    /// Compare two files once per unordered pair.
    fn same(&mut self, a: &NormalizedPath, b: &NormalizedPath) -> Result<bool> {
        let key = if a <= b {
            (a.clone(), b.clone())
        } else {
            (b.clone(), a.clone())
        };
        if let Some(&verdict) = self.verdicts.get(&key) {
            return Ok(verdict);
        }
        let left = self.normalized(a)?.to_string();
        let verdict = left == self.normalized(b)?;
        self.verdicts.insert(key, verdict);
        Ok(verdict)
    }
}

/// Find redundant bunch files under `root`.
///
/// `base_suffix` names the base file itself in `chains`. Along each chain a
/// present file is compared with the nearest present file before it; files
/// missing on disk are skipped. A chain whose first file is missing is not
/// compared at all.
pub fn find_redundant(
    root: &NormalizedPath,
    chains: &[ExtensionChain],
    base_suffix: &str,
    ignore: &IgnoreRules,
) -> Result<Vec<RedundantFile>> {
    let extensions: BTreeSet<String> = chains
        .iter()
        .flat_map(|c| c.as_slice().iter().cloned())
        .filter(|ext| ext != base_suffix)
        .collect();

    let scanner = TreeScanner::new(root, extensions).with_ignore(ignore.clone());
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

    let mut comparator = Comparator::new(root);
    let mut redundant: BTreeMap<NormalizedPath, NormalizedPath> = BTreeMap::new();

    for base in &bases {
        for chain in chains {
            let mut previous: Option<NormalizedPath> = None;
            for (position, suffix) in chain.as_slice().iter().enumerate() {
                let file = if suffix == base_suffix {
                    base.clone()
                } else {
                    base.with_suffix(suffix)
                };
                if !root.join(file.as_str()).is_file() {
                    if position == 0 {
                        break;
                    }
                    continue;
                }
                if let Some(prev) = &previous {
                    if comparator.same(prev, &file)? {
                        tracing::debug!(path = %file, same_as = %prev, "Redundant bunch file");
                        redundant.entry(file.clone()).or_insert_with(|| prev.clone());
                    }
                }
                previous = Some(file);
            }
        }
    }

    Ok(redundant
        .into_iter()
        .map(|(path, same_as)| RedundantFile { path, same_as })
        .collect())
}

/// Report, delete or commit-delete redundant bunch files per the rule file.
pub fn reduce(repo: &dyn RepositoryService, options: &ReduceOptions) -> Result<ReduceReport> {
    let root = repo.workdir().clone();
    let rules = RuleFile::load(&root)?;
    let chains = rules.chains()?;
    let redundant = find_redundant(&root, &chains, rules.current(), &options.ignore)?;

    let mut report = ReduceReport {
        action: options.action,
        redundant,
        commit: None,
    };
    if options.action == ReduceAction::Print || report.redundant.is_empty() {
        return Ok(report);
    }

    let mut changes = Vec::with_capacity(report.redundant.len());
    for file in &report.redundant {
        bunch_fs::io::remove_file(&root.join(file.path.as_str()))?;
        changes.push(FileChange::new(ChangeKind::Remove, file.path.clone()));
    }
    tracing::info!(removed = changes.len(), "Deleted redundant bunch files");

    if options.action == ReduceAction::Commit {
        let commit_options = CommitOptions {
            no_verify: options.no_verify,
            author: None,
        };
        report.commit = repo.stage_and_commit(&changes, &options.commit_title, &commit_options)?;
    }
    Ok(report)
}
