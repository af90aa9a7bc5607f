//! Log command implementation

use std::path::Path;

use colored::Colorize;

use bunch_core::{LogOptions, log};

use crate::context::open_repository;
use crate::error::Result;

/// Run the log command
pub fn run_log(start: &Path, since: Option<&str>, last: Option<u64>, json: bool) -> Result<()> {
    let last = last.map(|n| usize::try_from(n).unwrap_or(usize::MAX));
    let options = LogOptions::from_args(since, last)?;
    let repo = open_repository(start)?;
    let report = log(&repo, &options)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{} commits processed", report.processed);
    for entry in &report.entries {
        let mut counts = String::new();
        if entry.added > 0 {
            counts.push_str(&format!("{} ", format!("+{}", entry.added).green()));
        }
        if entry.deleted > 0 {
            counts.push_str(&format!("{} ", format!("-{}", entry.deleted).red()));
        }
        println!(
            "{}{} {} {} {}",
            counts,
            entry.hash.get(..11).unwrap_or(&entry.hash).dimmed(),
            entry.author.cyan(),
            entry.when.format("%Y-%m-%d %H:%M:%S %z"),
            entry.title
        );
    }
    Ok(())
}
