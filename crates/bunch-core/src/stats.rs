//! Bunch file statistics for a directory.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use bunch_fs::{IgnoreRules, NormalizedPath, TreeScanner, is_tombstone};

use crate::Result;

/// Counts for one suffix, or for all suffixes together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SuffixStats {
    pub suffix: String,
    /// Bunch files with content
    pub exists: usize,
    /// Tombstones
    pub deleted: usize,
    pub total: usize,
}

impl SuffixStats {
    fn named(suffix: &str) -> Self {
        Self {
            suffix: suffix.to_string(),
            ..Self::default()
        }
    }

    fn count(&mut self, tombstone: bool) {
        self.total += 1;
        if tombstone {
            self.deleted += 1;
        } else {
            self.exists += 1;
        }
    }
}

/// Statistics for a directory.
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub directory: NormalizedPath,
    /// Distinct base files that have at least one bunch file
    pub affected_bases: usize,
    pub all: SuffixStats,
    /// One row per extension, in rule-file order
    pub suffixes: Vec<SuffixStats>,
}

/// Bunch file count for one immediate subdirectory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirCount {
    /// Directory name, `<root>` for files directly in the directory
    pub name: String,
    /// `None` when the directory is ignored by the scanner
    pub count: Option<usize>,
}

/// Per-subdirectory overview.
#[derive(Debug, Clone, Serialize)]
pub struct ListingReport {
    pub directory: NormalizedPath,
    pub entries: Vec<DirCount>,
    pub total: usize,
}

/// Count bunch files under `dir` by suffix.
pub fn stats(dir: &NormalizedPath, extensions: &[String], ignore: &IgnoreRules) -> Result<StatsReport> {
    let scanner = TreeScanner::new(dir, extensions.iter().cloned()).with_ignore(ignore.clone());

    let mut all = SuffixStats::named("all");
    let mut by_suffix: BTreeMap<String, SuffixStats> = BTreeMap::new();
    let mut bases = BTreeSet::new();

    for file in scanner.matches() {
        let on_disk = dir.join(file.as_str());
        if !on_disk.is_file() {
            continue;
        }
        let Some(ext) = file.extension().map(str::to_string) else {
            continue;
        };
        let tombstone = is_tombstone(&on_disk)?;
        all.count(tombstone);
        by_suffix
            .entry(ext.clone())
            .or_insert_with(|| SuffixStats::named(&ext))
            .count(tombstone);
        if let Some(base) = file.strip_extension() {
            bases.insert(base);
        }
    }

    let suffixes = extensions
        .iter()
        .map(|ext| by_suffix.remove(ext).unwrap_or_else(|| SuffixStats::named(ext)))
        .collect();

    tracing::debug!(dir = %dir, files = all.total, "Collected stats");
    Ok(StatsReport {
        directory: dir.clone(),
        affected_bases: bases.len(),
        all,
        suffixes,
    })
}

/// Count bunch files per immediate subdirectory of `dir`.
pub fn list_stats(
    dir: &NormalizedPath,
    extensions: &[String],
    ignore: &IgnoreRules,
) -> Result<ListingReport> {
    const ROOT_NAME: &str = "<root>";

    let scanner = TreeScanner::new(dir, extensions.iter().cloned()).with_ignore(ignore.clone());
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut total = 0;

    for file in scanner.matches() {
        if !dir.join(file.as_str()).is_file() {
            continue;
        }
        let name = match file.as_str().split_once('/') {
            Some((first, _)) => first.to_string(),
            None => ROOT_NAME.to_string(),
        };
        *counts.entry(name).or_default() += 1;
        total += 1;
    }

    let mut entries = vec![DirCount {
        name: ROOT_NAME.to_string(),
        count: Some(counts.remove(ROOT_NAME).unwrap_or(0)),
    }];

    let native = dir.to_native();
    let read_dir = std::fs::read_dir(&native).map_err(|e| bunch_fs::Error::io(&native, e))?;
    let mut subdirs: Vec<(String, bool)> = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|e| bunch_fs::Error::io(&native, e))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        let ignored = ignore.should_ignore_dir(&path, &native);
        subdirs.push((name, ignored));
    }
    subdirs.sort();

    for (name, ignored) in subdirs {
        let count = if ignored {
            None
        } else {
            Some(counts.remove(&name).unwrap_or(0))
        };
        entries.push(DirCount { name, count });
    }

    Ok(ListingReport {
        directory: dir.clone(),
        entries,
        total,
    })
}
