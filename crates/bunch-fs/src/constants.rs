//! Well-known names inside a bunch-managed working tree.

use std::path::Path;

/// Standard file and directory names the scanner and rule loader care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BunchPath {
    /// The `.git` marker (directory in a main checkout, file in a worktree)
    GitDir,
    /// The `.bunch` rule file at the repository root
    RuleFile,
    /// Gradle's per-project cache directory
    GradleDir,
    /// IDE build output directory
    OutDir,
    /// Gradle build output directory (only when next to a gradle script)
    BuildDir,
}

impl BunchPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GitDir => ".git",
            Self::RuleFile => ".bunch",
            Self::GradleDir => ".gradle",
            Self::OutDir => "out",
            Self::BuildDir => "build",
        }
    }
}

/// Gradle scripts whose presence turns a sibling `build` directory into output.
pub const GRADLE_SCRIPTS: [&str; 2] = ["build.gradle", "build.gradle.kts"];

impl AsRef<Path> for BunchPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for BunchPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for BunchPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
