//! Stats command implementation

use std::path::Path;

use colored::Colorize;

use bunch_core::{SuffixStats, list_stats, read_extensions, stats};
use bunch_fs::{IgnoreRules, NormalizedPath};
use bunch_git::RepositoryService;

use crate::context::open_repository;
use crate::error::{CliError, Result};

/// Run the stats command
pub fn run_stats(start: &Path, ignore: &IgnoreRules, path: Option<&Path>, ls: bool, json: bool) -> Result<()> {
    let repo = open_repository(start)?;
    let extensions = read_extensions(repo.workdir())?;

    let dir = match path {
        Some(p) if p.is_absolute() => p.to_path_buf(),
        Some(p) => start.join(p),
        None => repo.workdir().to_native(),
    };
    if !dir.is_dir() {
        return Err(CliError::user(format!("Not a directory: {}", dir.display())));
    }
    let dir = NormalizedPath::new(&dir);

    if ls {
        let report = list_stats(&dir, &extensions, ignore)?;
        if json {
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }
        println!("{} {}", "Directory".bold(), report.directory);
        for entry in &report.entries {
            match entry.count {
                Some(count) => println!("   {:>6}  {}", count, entry.name),
                None => println!("   {:>6}  {}", "ignore".dimmed(), entry.name.dimmed()),
            }
        }
        println!("   {:>6}  {}", report.total.to_string().bold(), "total".bold());
        return Ok(());
    }

    let report = stats(&dir, &extensions, ignore)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{} {}", "Directory".bold(), report.directory);
    println!("{}: {}", "Affected files".dimmed(), report.affected_bases);
    println!();
    println!("   {:<10} {:>7} {:>7} {:>7}", "suffix", "exists", "deleted", "total");
    print_row(&report.all);
    for row in &report.suffixes {
        print_row(row);
    }
    Ok(())
}

fn print_row(row: &SuffixStats) {
    println!(
        "   {:<10} {:>7} {:>7} {:>7}",
        row.suffix.cyan(),
        row.exists,
        row.deleted,
        row.total
    );
}
