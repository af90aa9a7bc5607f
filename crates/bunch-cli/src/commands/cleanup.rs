//! Cleanup command implementation

use std::path::Path;

use colored::Colorize;

use bunch_core::{CleanupOptions, cleanup};
use bunch_fs::IgnoreRules;

use super::short;
use crate::context::open_repository;
use crate::error::Result;

/// Run the cleanup command
pub fn run_cleanup(
    start: &Path,
    ignore: &IgnoreRules,
    extension: Option<&str>,
    no_commit: bool,
    title: Option<&str>,
    no_verify: bool,
) -> Result<()> {
    let repo = open_repository(start)?;
    let mut options = CleanupOptions {
        extension: extension.map(str::to_string),
        no_commit,
        no_verify,
        ignore: ignore.clone(),
        ..CleanupOptions::default()
    };
    if let Some(title) = title {
        options.commit_title = title.to_string();
    }

    let report = cleanup(&repo, &options)?;

    if report.removed.is_empty() {
        println!("{} No bunch files found.", "OK".green().bold());
        return Ok(());
    }
    for path in &report.removed {
        println!("   {} {}", "-".red(), path);
    }
    match &report.commit {
        Some(hash) => println!(
            "{} Removed {} file(s) in {}",
            "OK".green().bold(),
            report.removed.len(),
            short(hash).dimmed()
        ),
        None => println!("{} Removed {} file(s)", "OK".green().bold(), report.removed.len()),
    }
    Ok(())
}
