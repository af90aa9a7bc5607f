//! Command implementations for bunch-cli

pub mod check;
pub mod cleanup;
pub mod log;
pub mod reduce;
pub mod replay;
pub mod restore;
pub mod stats;
pub mod switch;

pub use check::run_check;
pub use cleanup::run_cleanup;
pub use log::run_log;
pub use reduce::run_reduce;
pub use replay::{run_apply, run_cp};
pub use restore::run_restore;
pub use stats::run_stats;
pub use switch::run_switch;

/// First 7 characters of a commit hash.
pub(crate) fn short(hash: &str) -> &str {
    hash.get(..7).unwrap_or(hash)
}
