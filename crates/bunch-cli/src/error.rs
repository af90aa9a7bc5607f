//! Error types for bunch-cli

use bunch_core::ErrorKind;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from bunch-core
    #[error(transparent)]
    Core(#[from] bunch_core::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Report serialization failed
    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),

    /// A consistency check found problems; the report is already printed
    #[error("{count} commit(s) with forgotten bunch files")]
    Findings { count: usize },

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }

    /// Process exit code: 1 usage, 2 domain or consistency, 3 unexpected.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Core(e) => match e.kind() {
                ErrorKind::Usage => 1,
                ErrorKind::Unexpected => 3,
                ErrorKind::RuleResolution
                | ErrorKind::Precondition
                | ErrorKind::Collision
                | ErrorKind::NoOp => 2,
            },
            Self::User { .. } => 1,
            Self::Findings { .. } => 2,
            Self::Io(_) | Self::Json(_) => 3,
        }
    }
}

impl From<bunch_git::Error> for CliError {
    fn from(e: bunch_git::Error) -> Self {
        Self::Core(e.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_error_message() {
        let error = CliError::user("test error");
        assert_eq!(format!("{}", error), "test error");
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn test_exit_codes_follow_error_kind() {
        let dirty = CliError::from(bunch_core::Error::DirtyWorkingTree {
            paths: vec!["a".into()],
        });
        assert_eq!(dirty.exit_code(), 2);

        let missing_rev = CliError::from(bunch_git::Error::RevisionNotFound {
            rev: "nope".into(),
        });
        assert_eq!(missing_rev.exit_code(), 1);

        let io = CliError::from(std::io::Error::other("disk"));
        assert_eq!(io.exit_code(), 3);

        assert_eq!(CliError::Findings { count: 1 }.exit_code(), 2);
    }
}
