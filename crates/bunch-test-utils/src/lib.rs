//! Shared test utilities for the bunch workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`git`] - git2 fixtures: configured repositories and commit helpers
//! - [`repo`] - [`repo::TestRepo`], a temporary repository with file and history helpers

pub mod git;
pub mod repo;
