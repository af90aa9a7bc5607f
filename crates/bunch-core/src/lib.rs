//! Variant resolution and switching engine for bunch files
//!
//! A bunch file `<base>.<suffix>` holds the content `<base>` should have on
//! the branch named by `<suffix>`. This crate implements:
//!
//! - **Chain resolution**: `.bunch` rules to ordered suffix priorities
//! - **Switch**: replace base files with their highest-priority variant, atomically or step by step
//! - **Restore / apply / cp**: replay commit ranges between base files and bunch files
//! - **Check**: find commits that edited a base file but not its variants
//! - **Reduce**: find variants identical to what they would inherit
//! - **Cleanup / stats / log**: remove or count bunch files, list commits adding or deleting them
//!
//! # Architecture
//!
//! ```text
//!             bunch-cli
//!                 |
//!            bunch-core
//!             /      \
//!       bunch-git --> bunch-fs
//! ```
//!
//! Every operation receives the repository explicitly, as a
//! [`bunch_git::RepositoryService`] or a root path; nothing depends on the
//! process working directory.

pub mod chain;
pub mod check;
pub mod cleanup;
pub mod error;
pub mod history;
pub mod precondition;
pub mod reduce;
pub mod replay;
pub mod restore;
pub mod stats;
pub mod switch;
pub mod titles;

pub use chain::{ExtensionChain, RuleFile, read_extensions, resolve_chain};
pub use check::{CheckReport, ForgottenFile, ProblemCommit, check, check_commits};
pub use cleanup::{CleanupOptions, CleanupReport, cleanup};
pub use error::{Error, ErrorKind, Result};
pub use history::{DEFAULT_LOG_COUNT, LogEntry, LogOptions, LogReport, log, parse_since};
pub use reduce::{ReduceAction, ReduceOptions, ReduceReport, RedundantFile, find_redundant, reduce};
pub use replay::{ReplayReport, ReplayedCommit, apply, cherry_pick};
pub use restore::{RestoreOptions, RestoreReport, restore};
pub use stats::{DirCount, ListingReport, StatsReport, SuffixStats, list_stats, stats};
pub use switch::{SwitchMode, SwitchOptions, SwitchReport, switch, switch_atomic, switch_incremental};
pub use titles::parse_switch_target;
