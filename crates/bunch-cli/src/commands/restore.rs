//! Restore command implementation

use std::path::Path;

use colored::Colorize;

use bunch_core::{RestoreOptions, restore};

use super::replay::print_replay;
use super::short;
use crate::context::open_repository;
use crate::error::Result;

/// Flags of `bunch restore`.
#[derive(Debug, Clone, Default)]
pub struct RestoreFlags {
    pub until: Option<String>,
    pub suffix: Option<String>,
    pub all: bool,
    pub no_backup: bool,
    pub prefix: Option<String>,
    pub title: Option<String>,
    pub no_verify: bool,
    pub json: bool,
}

/// Run the restore command
pub fn run_restore(start: &Path, flags: &RestoreFlags) -> Result<()> {
    let repo = open_repository(start)?;
    let mut options = RestoreOptions {
        until: flags.until.clone(),
        suffix: flags.suffix.clone(),
        backup: !flags.no_backup,
        all: flags.all,
        prefix: flags.prefix.clone(),
        no_verify: flags.no_verify,
        ..RestoreOptions::default()
    };
    if let Some(title) = &flags.title {
        options.title_template = title.clone();
    }

    let report = restore(&repo, &options)?;

    if flags.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} Restored onto {} into .{} files",
        "=>".blue().bold(),
        short(&report.until).dimmed(),
        report.suffix.cyan()
    );
    if let Some(branch) = &report.backup_branch {
        println!("   Backup branch: {}", branch.cyan());
    }
    print_replay(&report.replay);
    Ok(())
}
