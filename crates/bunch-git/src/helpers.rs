//! Shared git2 helper functions
//!
//! Small conversions and lookups used by both the history reader and the
//! committing side of [`crate::GitRepository`].

use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};
use git2::{Commit, ErrorCode, Repository};

use crate::{Error, Result, Signature};

/// Get the current branch name from a repository.
///
/// Returns the branch name if HEAD points to a branch, or `None` if HEAD is detached.
/// An unborn branch (no commits yet) still reports its name.
pub fn get_current_branch(repo: &Repository) -> Result<Option<String>> {
    let head = match repo.head() {
        Ok(head) => head,
        Err(e) if e.code() == ErrorCode::UnbornBranch => {
            let reference = repo.find_reference("HEAD")?;
            let target = reference.symbolic_target().unwrap_or("HEAD");
            return Ok(Some(
                target.trim_start_matches("refs/heads/").to_string(),
            ));
        }
        Err(e) => return Err(e.into()),
    };

    if head.is_branch() {
        Ok(Some(head.shorthand().unwrap_or("HEAD").to_string()))
    } else {
        Ok(None)
    }
}

/// The commit HEAD points at, or `None` for a repository without commits.
pub fn head_commit(repo: &Repository) -> Result<Option<Commit<'_>>> {
    match repo.head() {
        Ok(head) => Ok(Some(head.peel_to_commit()?)),
        Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Resolve any revision string to a commit.
pub fn resolve_commit<'r>(repo: &'r Repository, rev: &str) -> Result<Commit<'r>> {
    let object = repo
        .revparse_single(rev)
        .map_err(|_| Error::RevisionNotFound {
            rev: rev.to_string(),
        })?;
    Ok(object.peel_to_commit()?)
}

/// Convert a git2 signature, keeping its original timezone.
pub fn from_git_signature(sig: &git2::Signature<'_>) -> Signature {
    let time = sig.when();
    let offset =
        FixedOffset::east_opt(time.offset_minutes() * 60).unwrap_or_else(|| Utc.fix());
    let when = offset
        .timestamp_opt(time.seconds(), 0)
        .single()
        .unwrap_or_else(|| DateTime::<Utc>::default().with_timezone(&offset));

    Signature {
        name: sig.name().unwrap_or("Unknown").to_string(),
        email: sig.email().unwrap_or("").to_string(),
        when,
    }
}

/// Convert back to a git2 signature with the recorded timestamp.
pub fn to_git_signature(sig: &Signature) -> Result<git2::Signature<'static>> {
    let time = git2::Time::new(sig.when.timestamp(), sig.when.offset().local_minus_utc() / 60);
    Ok(git2::Signature::new(&sig.name, &sig.email, &time)?)
}

/// The configured identity, falling back to a fixed one for unconfigured
/// repositories so automated commits never fail on missing `user.name`.
pub fn default_signature(repo: &Repository) -> Result<git2::Signature<'static>> {
    match repo.signature() {
        Ok(sig) => Ok(sig),
        Err(e) => {
            tracing::debug!(error = %e, "No git identity configured, using fallback");
            Ok(git2::Signature::now("bunch", "bunch@localhost")?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_get_current_branch_on_main() {
        let temp_dir = TempDir::new().unwrap();
        let repo = Repository::init(temp_dir.path()).unwrap();

        let sig = git2::Signature::now("Test", "test@test.com").unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        repo.commit(Some("HEAD"), &sig, &sig, "Initial", &tree, &[])
            .unwrap();

        let branch = get_current_branch(&repo).unwrap();
        // Default branch is either "main" or "master" depending on git config
        assert!(branch == Some("main".to_string()) || branch == Some("master".to_string()));
    }

    #[test]
    fn test_head_commit_of_empty_repo_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let repo = Repository::init(temp_dir.path()).unwrap();
        assert!(head_commit(&repo).unwrap().is_none());
    }

    #[test]
    fn test_signature_round_trip_keeps_offset() {
        let time = git2::Time::new(1_700_000_000, 120);
        let original = git2::Signature::new("Ann", "ann@example.com", &time).unwrap();

        let converted = from_git_signature(&original);
        let back = to_git_signature(&converted).unwrap();

        assert_eq!(back.when().seconds(), 1_700_000_000);
        assert_eq!(back.when().offset_minutes(), 120);
        assert_eq!(back.name(), Some("Ann"));
    }
}
