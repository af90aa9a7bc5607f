//! Switch command implementation

use std::path::Path;

use colored::Colorize;

use bunch_core::{SwitchMode, SwitchOptions, resolve_chain, switch};
use bunch_fs::IgnoreRules;
use bunch_git::{ChangeKind, RepositoryService};

use super::short;
use crate::context::open_repository;
use crate::error::Result;

/// Flags of `bunch switch`.
#[derive(Debug, Clone, Default)]
pub struct SwitchFlags {
    pub step: bool,
    pub cleanup: bool,
    pub title: Option<String>,
    pub history: usize,
    pub no_verify: bool,
    pub json: bool,
}

/// Run the switch command
pub fn run_switch(start: &Path, ignore: &IgnoreRules, rule: &str, flags: &SwitchFlags) -> Result<()> {
    let repo = open_repository(start)?;
    let chain = resolve_chain(repo.workdir(), rule)?;

    let mut options = SwitchOptions {
        mode: if flags.step {
            SwitchMode::Incremental
        } else {
            SwitchMode::Atomic
        },
        history_window: flags.history,
        cleanup: flags.cleanup,
        no_verify: flags.no_verify,
        ignore: ignore.clone(),
        ..SwitchOptions::default()
    };
    if let Some(title) = &flags.title {
        options.title_template = title.clone();
    }

    if !flags.json {
        println!("{} Switching along {}", "=>".blue().bold(), chain.to_string().cyan());
    }

    let report = switch(&repo, &chain, &options)?;

    if flags.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.commits.is_empty() && report.changes.is_empty() {
        println!("{} Already on {}, nothing to switch.", "OK".green().bold(), chain.target().cyan());
        return Ok(());
    }

    for change in &report.changes {
        let marker = match change.kind {
            ChangeKind::Add => "+".green(),
            ChangeKind::Modify => "~".yellow(),
            ChangeKind::Remove => "-".red(),
        };
        println!("   {} {}", marker, change.path);
    }
    println!();
    for commit in &report.commits {
        println!("{} {} {}", "OK".green().bold(), short(&commit.hash).dimmed(), commit.title);
    }
    Ok(())
}
