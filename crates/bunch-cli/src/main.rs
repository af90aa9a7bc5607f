//! Bunch CLI
//!
//! Switches a working tree between branch-specific file variants and keeps
//! history consistent around those switches.

mod cli;
mod commands;
mod context;
mod error;

use std::path::Path;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use bunch_fs::IgnoreRules;
use cli::{Cli, Commands};
use commands::restore::RestoreFlags;
use commands::switch::SwitchFlags;
use error::Result;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version go to stdout and are not failures
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

/// Log to stderr. `RUST_LOG` wins; otherwise debug with `-v`, warn without.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("{}: failed to set tracing subscriber: {}", "warning".yellow().bold(), e);
    }
    tracing::debug!("Verbose mode enabled");
}

fn run(cli: Cli) -> Result<()> {
    let start = context::start_dir(cli.repo.as_deref())?;
    let ignore = cli
        .exclude
        .iter()
        .fold(IgnoreRules::new(), |rules, dir| rules.with_dir(dir));

    match cli.command {
        Some(cmd) => execute_command(&start, &ignore, cmd),
        None => {
            // No command provided - show help hint
            println!("{} variant switching for bunch files", "bunch".green().bold());
            println!();
            println!("Run {} for available commands.", "bunch --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(start: &Path, ignore: &IgnoreRules, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Switch {
            rule,
            step,
            cleanup,
            title,
            history,
            no_verify,
            json,
        } => {
            let flags = SwitchFlags {
                step,
                cleanup,
                title,
                history,
                no_verify,
                json,
            };
            commands::run_switch(start, ignore, &rule, &flags)
        }
        Commands::Check {
            since,
            until,
            extensions,
            json,
        } => commands::run_check(start, &since, &until, &extensions, json),
        Commands::Reduce {
            action,
            message,
            no_verify,
            json,
        } => commands::run_reduce(start, ignore, action.into(), message.as_deref(), no_verify, json),
        Commands::Cp {
            since,
            until,
            suffix,
            no_verify,
        } => commands::run_cp(start, &since, &until, &suffix, no_verify),
        Commands::Apply {
            since,
            until,
            suffix,
            no_verify,
        } => commands::run_apply(start, &since, &until, &suffix, no_verify),
        Commands::Restore {
            until,
            suffix,
            all,
            no_backup,
            prefix,
            title,
            no_verify,
            json,
        } => {
            let flags = RestoreFlags {
                until,
                suffix,
                all,
                no_backup,
                prefix,
                title,
                no_verify,
                json,
            };
            commands::run_restore(start, &flags)
        }
        Commands::Cleanup {
            extension,
            no_commit,
            title,
            no_verify,
        } => commands::run_cleanup(
            start,
            ignore,
            extension.as_deref(),
            no_commit,
            title.as_deref(),
            no_verify,
        ),
        Commands::Stats { path, ls, json } => commands::run_stats(start, ignore, path.as_deref(), ls, json),
        Commands::Log { since, last, json } => commands::run_log(start, since.as_deref(), last, json),
    }
}
