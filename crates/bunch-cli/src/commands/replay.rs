//! cp and apply command implementations

use std::path::Path;

use colored::Colorize;

use bunch_core::{ReplayReport, apply, cherry_pick};

use super::short;
use crate::context::open_repository;
use crate::error::Result;

/// Run the cp command
pub fn run_cp(start: &Path, since: &str, until: &str, suffix: &str, no_verify: bool) -> Result<()> {
    let repo = open_repository(start)?;
    println!("{} Copying {}..{} into .{} files", "=>".blue().bold(), until, since, suffix.cyan());
    let report = cherry_pick(&repo, since, until, suffix, no_verify)?;
    print_replay(&report);
    Ok(())
}

/// Run the apply command
pub fn run_apply(start: &Path, since: &str, until: &str, suffix: &str, no_verify: bool) -> Result<()> {
    let repo = open_repository(start)?;
    println!("{} Applying .{} changes from {}..{}", "=>".blue().bold(), suffix.cyan(), until, since);
    let report = apply(&repo, since, until, suffix, no_verify)?;
    print_replay(&report);
    Ok(())
}

pub(crate) fn print_replay(report: &ReplayReport) {
    for commit in &report.replayed {
        println!(
            "   {} {} {} {}",
            short(&commit.source).dimmed(),
            "->".dimmed(),
            short(&commit.hash),
            commit.title
        );
    }
    for commit in &report.skipped {
        println!("   {} {} {} (no changes)", "!".yellow(), short(&commit.hash).dimmed(), commit.title);
    }
    println!(
        "{} {} commit(s) created, {} skipped.",
        "OK".green().bold(),
        report.replayed.len(),
        report.skipped.len()
    );
}
