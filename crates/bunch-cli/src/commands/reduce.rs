//! Reduce command implementation

use std::path::Path;

use colored::Colorize;

use bunch_core::{ReduceAction, ReduceOptions, reduce};
use bunch_fs::IgnoreRules;

use super::short;
use crate::context::open_repository;
use crate::error::Result;

/// Run the reduce command
pub fn run_reduce(
    start: &Path,
    ignore: &IgnoreRules,
    action: ReduceAction,
    message: Option<&str>,
    no_verify: bool,
    json: bool,
) -> Result<()> {
    let repo = open_repository(start)?;
    let mut options = ReduceOptions {
        action,
        no_verify,
        ignore: ignore.clone(),
        ..ReduceOptions::default()
    };
    if let Some(message) = message {
        options.commit_title = message.to_string();
    }

    let report = reduce(&repo, &options)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.redundant.is_empty() {
        println!("{} No redundant bunch files.", "OK".green().bold());
        return Ok(());
    }

    let verb = match action {
        ReduceAction::Print => "Redundant",
        ReduceAction::Delete | ReduceAction::Commit => "Deleted",
    };
    println!("{} {} {} file(s):", "=>".blue().bold(), verb, report.redundant.len());
    for file in &report.redundant {
        println!("   {} {} {}", "-".yellow(), file.path, format!("(same as {})", file.same_as).dimmed());
    }
    if let Some(hash) = &report.commit {
        println!("{} {} {}", "OK".green().bold(), short(hash).dimmed(), options.commit_title);
    }
    Ok(())
}
