//! Lazy discovery of bunch files under a repository root.

use std::collections::BTreeSet;
use std::path::Path;

use walkdir::{DirEntry, WalkDir};

use crate::constants::{BunchPath, GRADLE_SCRIPTS};
use crate::NormalizedPath;

/// Decides which directories the scanner never descends into.
///
/// VCS metadata, build output and nested repositories are always skipped;
/// callers may add further directory names.
#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    extra_dirs: Vec<String>,
}

impl IgnoreRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also skip every directory with this exact name.
    pub fn with_dir(mut self, name: impl Into<String>) -> Self {
        self.extra_dirs.push(name.into());
        self
    }

    /// Whether `dir` (somewhere below `root`) should be pruned from the walk.
    pub fn should_ignore_dir(&self, dir: &Path, root: &Path) -> bool {
        let Some(name) = dir.file_name().and_then(|n| n.to_str()) else {
            return false;
        };

        if name == BunchPath::GitDir.as_str() || name == BunchPath::GradleDir.as_str() {
            return true;
        }
        if name == BunchPath::OutDir.as_str() {
            return true;
        }
        if name == BunchPath::BuildDir.as_str() && is_gradle_build_dir(dir) {
            return true;
        }
        if self.extra_dirs.iter().any(|d| d == name) {
            return true;
        }

        // Nested checkout: its own `.git` dir, or a `.git` file for worktrees
        dir != root && dir.join(BunchPath::GitDir.as_str()).exists()
    }
}

fn is_gradle_build_dir(dir: &Path) -> bool {
    dir.parent()
        .is_some_and(|parent| GRADLE_SCRIPTS.iter().any(|s| parent.join(s).exists()))
}

/// Enumerates entries whose last extension is one of a suffix set.
///
/// The scan is lazy and restartable: every call to [`TreeScanner::matches`]
/// starts a fresh walk. Order is unspecified.
#[derive(Debug, Clone)]
pub struct TreeScanner {
    root: NormalizedPath,
    suffixes: BTreeSet<String>,
    ignore: IgnoreRules,
}

impl TreeScanner {
    pub fn new<I, S>(root: &NormalizedPath, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            root: root.clone(),
            suffixes: suffixes.into_iter().map(Into::into).collect(),
            ignore: IgnoreRules::default(),
        }
    }

    pub fn with_ignore(mut self, ignore: IgnoreRules) -> Self {
        self.ignore = ignore;
        self
    }

    /// Root-relative paths of matching entries.
    ///
    /// Directories whose name matches are yielded too, so callers can
    /// reject them explicitly instead of silently skipping them.
    pub fn matches(&self) -> impl Iterator<Item = NormalizedPath> + '_ {
        let root = self.root.to_native();
        WalkDir::new(&root)
            .follow_links(false)
            .into_iter()
            .filter_entry(move |entry| !self.is_pruned(entry, &root))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable entry during scan");
                    None
                }
            })
            .filter(|entry| entry.depth() > 0)
            .filter_map(move |entry| {
                let path = NormalizedPath::new(entry.path());
                let relative = path.relative_to(&self.root)?;
                let ext = relative.extension()?;
                self.suffixes.contains(ext).then_some(relative)
            })
    }

    fn is_pruned(&self, entry: &DirEntry, root: &Path) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && self.ignore.should_ignore_dir(entry.path(), root)
    }
}
