//! Error types for bunch-core

use std::path::PathBuf;

/// Result type for bunch-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`], used to pick a process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad arguments: unknown refs, malformed chains
    Usage,
    /// The rule file could not produce what was asked of it
    RuleResolution,
    /// The repository is not in a state the operation accepts
    Precondition,
    /// A backup file is already in the way
    Collision,
    /// The operation would not change anything
    NoOp,
    /// I/O or git failure
    Unexpected,
}

/// Errors that can occur in bunch-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `.bunch` is missing from the repository root
    #[error("Rule file not found: {path}")]
    MissingRuleFile { path: PathBuf },

    /// `.bunch` has no non-blank line naming the current suffix
    #[error("First line in '{path}' should contain the current branch suffix")]
    EmptyBaseLine { path: PathBuf },

    #[error("Can't find rule for '{target}' in '{path}'")]
    NoMatchingRule { target: String, path: PathBuf },

    #[error("Can't find any extensions in '{path}'")]
    NoExtensions { path: PathBuf },

    #[error("Invalid chain '{chain}': empty suffix")]
    InvalidChain { chain: String },

    #[error("Can't parse date '{input}'; use a git --since form such as '2.weeks.ago' or '2024-01-31'")]
    InvalidDate { input: String },

    #[error("Working tree has uncommitted changes: {}", paths.join(", "))]
    DirtyWorkingTree { paths: Vec<String> },

    #[error("Unresolved switch commit {hash} '{title}'; restore or revert it first")]
    UnresolvedSwitch { hash: String, title: String },

    #[error("Bunch directories are not supported: {path}")]
    TargetIsDirectory { path: String },

    #[error("No until ref given and no switch commit found")]
    NoSwitchCommit,

    #[error("No suffix given for custom until ref '{until}'")]
    AmbiguousBoundary { until: String },

    #[error("Can't restore branch: '{path}' already exists")]
    Collision { path: String },

    #[error("Nothing to do: {message}")]
    NoOp { message: String },

    /// Filesystem error from bunch-fs
    #[error(transparent)]
    Fs(#[from] bunch_fs::Error),

    /// Git error from bunch-git
    #[error(transparent)]
    Git(#[from] bunch_git::Error),
}

impl Error {
    /// Classify this error for exit-code mapping.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingRuleFile { .. }
            | Self::EmptyBaseLine { .. }
            | Self::NoMatchingRule { .. }
            | Self::NoExtensions { .. } => ErrorKind::RuleResolution,
            Self::InvalidChain { .. } | Self::InvalidDate { .. } => ErrorKind::Usage,
            Self::DirtyWorkingTree { .. }
            | Self::UnresolvedSwitch { .. }
            | Self::TargetIsDirectory { .. }
            | Self::NoSwitchCommit
            | Self::AmbiguousBoundary { .. } => ErrorKind::Precondition,
            Self::Collision { .. } => ErrorKind::Collision,
            Self::NoOp { .. } => ErrorKind::NoOp,
            Self::Fs(_) => ErrorKind::Unexpected,
            Self::Git(inner) => match inner {
                bunch_git::Error::NotARepository { .. }
                | bunch_git::Error::BareRepository { .. }
                | bunch_git::Error::BranchExists { .. } => ErrorKind::Precondition,
                bunch_git::Error::RevisionNotFound { .. } => ErrorKind::Usage,
                _ => ErrorKind::Unexpected,
            },
        }
    }
}
