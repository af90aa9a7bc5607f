//! Check command implementation

use std::path::Path;

use colored::Colorize;

use bunch_core::check;

use super::short;
use crate::context::open_repository;
use crate::error::{CliError, Result};

/// Run the check command
///
/// Problems are printed and then reported as [`CliError::Findings`] so the
/// process exits non-zero.
pub fn run_check(start: &Path, since: &str, until: &str, extensions: &[String], json: bool) -> Result<()> {
    let repo = open_repository(start)?;
    let extensions = (!extensions.is_empty()).then(|| extensions.to_vec());
    let report = check(&repo, since, until, extensions)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{} Checked {} commit(s) in {}..{}",
            "=>".blue().bold(),
            report.checked.len(),
            until,
            since
        );
        for problem in &report.problems {
            println!();
            println!(
                "{} {} {} {}",
                "FORGOTTEN".yellow().bold(),
                short(&problem.hash).dimmed(),
                problem.author.cyan(),
                problem.title
            );
            for file in &problem.files {
                println!("   {} {}", "-".yellow(), file);
            }
        }
        if report.is_ok() {
            println!("{} No forgotten bunch files.", "OK".green().bold());
        }
    }

    if report.is_ok() {
        Ok(())
    } else {
        Err(CliError::Findings {
            count: report.problems.len(),
        })
    }
}
