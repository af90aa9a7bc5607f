//! Git access for bunch
//!
//! The engine never touches git storage directly. Everything it needs from
//! version control goes through [`RepositoryService`]; [`GitRepository`] is
//! the `git2`-backed implementation.

pub mod commits;
pub mod error;
pub mod helpers;
pub mod repository;
pub mod service;

pub use error::{Error, Result};
pub use repository::GitRepository;
pub use service::{
    ChangeKind, CommitInfo, CommitOptions, CommitSummary, FileAction, FileChange,
    RepositoryService, Signature, TreeStatus,
};
