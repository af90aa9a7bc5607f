//! Repository context detection
//!
//! Finds the working-tree root from any directory inside it, so commands
//! work from subdirectories the way git does.

use std::path::{Path, PathBuf};

use bunch_fs::BunchPath;
use bunch_git::GitRepository;

use crate::error::Result;

/// Walk up from `start` to the nearest directory holding `.git`.
pub fn find_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(BunchPath::GitDir.as_str()).exists())
        .map(Path::to_path_buf)
}

/// The directory commands run in: `-C` resolved against the process
/// directory, or the process directory itself.
pub fn start_dir(repo: Option<&Path>) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(match repo {
        Some(dir) if dir.is_absolute() => dir.to_path_buf(),
        Some(dir) => cwd.join(dir),
        None => cwd,
    })
}

/// Open the repository containing `start`.
///
/// When no ancestor holds `.git`, `start` itself is opened so the error
/// names the directory the user asked for.
pub fn open_repository(start: &Path) -> Result<GitRepository> {
    let root = find_root(start).unwrap_or_else(|| start.to_path_buf());
    tracing::debug!(root = %root.display(), "Using repository root");
    Ok(GitRepository::open(root)?)
}
