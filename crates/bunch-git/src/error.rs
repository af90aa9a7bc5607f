//! Error types for bunch-git

use std::path::PathBuf;

/// Result type for bunch-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in bunch-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Filesystem error: {0}")]
    Fs(#[from] bunch_fs::Error),

    #[error("Not a git repository (no .git found): {path}")]
    NotARepository { path: PathBuf },

    #[error("Repository at {path} has no working tree")]
    BareRepository { path: PathBuf },

    #[error("Revision '{rev}' was not found")]
    RevisionNotFound { rev: String },

    #[error("Branch '{name}' already exists")]
    BranchExists { name: String },
}
