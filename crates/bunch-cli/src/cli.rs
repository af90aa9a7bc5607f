//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use bunch_core::ReduceAction;

/// Bunch - switch a working tree between branch-specific file variants
#[derive(Parser, Debug)]
#[command(name = "bunch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if started in this directory
    #[arg(short = 'C', long = "repo", global = true, env = "BUNCH_REPO")]
    pub repo: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Additional directory name to skip while scanning (repeatable)
    #[arg(long = "exclude", global = true, value_name = "DIR")]
    pub exclude: Vec<String>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Replace base files with their variants for a rule
    ///
    /// Examples:
    ///   bunch switch 192            # Resolve via .bunch
    ///   bunch switch 193_192_as32   # Explicit chain, origin first
    ///   bunch switch as32 --step    # One commit per donor suffix
    Switch {
        /// Rule name from .bunch, or an explicit `a_b_c` chain
        rule: String,

        /// Commit a backup step and one commit per donor instead of a single commit
        #[arg(long)]
        step: bool,

        /// Remove all bunch files after switching
        #[arg(long)]
        cleanup: bool,

        /// Switch commit title; `{target}` is replaced with the target suffix
        #[arg(short = 'm', long = "message")]
        title: Option<String>,

        /// How many recent commits to search for an unresolved switch (0 disables)
        #[arg(long, default_value_t = bunch_core::precondition::DEFAULT_HISTORY_WINDOW)]
        history: usize,

        /// Skip commit hooks
        #[arg(long)]
        no_verify: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Find commits that changed a base file but not its bunch files
    Check {
        /// Newest commit to check
        since: String,

        /// Parent of the oldest commit to check
        until: String,

        /// Extensions to check instead of those in .bunch
        #[arg(long = "ext", value_delimiter = ',')]
        extensions: Vec<String>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Find bunch files identical to the content they would inherit
    Reduce {
        /// What to do with redundant files
        #[arg(value_enum, default_value_t = ReduceMode::Print)]
        action: ReduceMode,

        /// Commit title for `commit`
        message: Option<String>,

        /// Skip commit hooks
        #[arg(long)]
        no_verify: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Copy commits into bunch files of a suffix
    Cp {
        /// Newest commit to copy
        since: String,

        /// Parent of the oldest commit to copy
        until: String,

        /// Suffix of the bunch files to write
        suffix: String,

        /// Skip commit hooks
        #[arg(long)]
        no_verify: bool,
    },

    /// Apply commits made on bunch files of a suffix to base files
    Apply {
        /// Newest commit to apply
        since: String,

        /// Parent of the oldest commit to apply
        until: String,

        /// Suffix whose bunch files are folded into base files
        suffix: String,

        /// Skip commit hooks
        #[arg(long)]
        no_verify: bool,
    },

    /// Move commits made after a switch into bunch files
    ///
    /// Without UNTIL the last switch commit is found and its target suffix used.
    Restore {
        /// Parent of the switch commit
        until: Option<String>,

        /// Suffix receiving the changes; required with UNTIL
        #[arg(long = "ext")]
        suffix: Option<String>,

        /// Redirect every changed file, not only files with bunch files
        #[arg(long)]
        all: bool,

        /// Do not create a backup branch
        #[arg(long)]
        no_backup: bool,

        /// Title prefix for replayed commits
        #[arg(long)]
        prefix: Option<String>,

        /// Switch commit title template used to find the switch
        #[arg(short = 'm', long = "message")]
        title: Option<String>,

        /// Skip commit hooks
        #[arg(long)]
        no_verify: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Delete bunch files
    Cleanup {
        /// Only delete files with this extension
        #[arg(long = "ext")]
        extension: Option<String>,

        /// Delete without committing
        #[arg(long)]
        no_commit: bool,

        /// Commit title; `{ext}` is replaced with the extension
        #[arg(short = 'm', long = "message")]
        title: Option<String>,

        /// Skip commit hooks
        #[arg(long)]
        no_verify: bool,
    },

    /// Count bunch files
    Stats {
        /// Directory to inspect, relative to the repository
        path: Option<PathBuf>,

        /// Count per immediate subdirectory instead of per suffix
        #[arg(long)]
        ls: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show recent commits that added or deleted bunch files
    #[command(after_help = "Example:\n  bunch log --since 1.day.2.weeks.ago")]
    Log {
        /// Only commits after this date, in git --since form
        #[arg(long, visible_alias = "after")]
        since: Option<String>,

        /// Inspect the last N commits (5 when --since is not given either)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        last: Option<u64>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}

/// `reduce` actions as accepted on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceMode {
    Print,
    Delete,
    Commit,
}

impl From<ReduceMode> for ReduceAction {
    fn from(mode: ReduceMode) -> Self {
        match mode {
            ReduceMode::Print => ReduceAction::Print,
            ReduceMode::Delete => ReduceAction::Delete,
            ReduceMode::Commit => ReduceAction::Commit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_switch_command() {
        let cli = Cli::parse_from(["bunch", "switch", "192"]);
        match cli.command {
            Some(Commands::Switch {
                rule,
                step,
                cleanup,
                title,
                history,
                ..
            }) => {
                assert_eq!(rule, "192");
                assert!(!step);
                assert!(!cleanup);
                assert_eq!(title, None);
                assert_eq!(history, 20);
            }
            _ => panic!("Expected Switch command"),
        }
    }

    #[test]
    fn parse_switch_step_with_title() {
        let cli = Cli::parse_from([
            "bunch", "switch", "193_192", "--step", "-m", "Switch to {target}",
        ]);
        match cli.command {
            Some(Commands::Switch { step, title, .. }) => {
                assert!(step);
                assert_eq!(title, Some("Switch to {target}".to_string()));
            }
            _ => panic!("Expected Switch command"),
        }
    }

    #[test]
    fn parse_global_repo_flag() {
        let cli = Cli::parse_from(["bunch", "-C", "/tmp/repo", "stats"]);
        assert_eq!(cli.repo, Some(PathBuf::from("/tmp/repo")));
    }

    #[test]
    fn parse_check_extension_list() {
        let cli = Cli::parse_from(["bunch", "check", "HEAD", "HEAD~3", "--ext", "192,as32"]);
        match cli.command {
            Some(Commands::Check {
                since,
                until,
                extensions,
                json,
            }) => {
                assert_eq!(since, "HEAD");
                assert_eq!(until, "HEAD~3");
                assert_eq!(extensions, vec!["192", "as32"]);
                assert!(!json);
            }
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn parse_reduce_defaults_to_print() {
        let cli = Cli::parse_from(["bunch", "reduce"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Reduce {
                action: ReduceMode::Print,
                message: None,
                ..
            })
        ));
    }

    #[test]
    fn parse_reduce_commit_with_message() {
        let cli = Cli::parse_from(["bunch", "reduce", "commit", "Drop duplicates"]);
        match cli.command {
            Some(Commands::Reduce {
                action, message, ..
            }) => {
                assert_eq!(action, ReduceMode::Commit);
                assert_eq!(message, Some("Drop duplicates".to_string()));
            }
            _ => panic!("Expected Reduce command"),
        }
    }

    #[test]
    fn parse_cp_command() {
        let cli = Cli::parse_from(["bunch", "cp", "HEAD", "HEAD~1", "as32"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Cp { ref suffix, .. }) if suffix == "as32"
        ));
    }

    #[test]
    fn parse_restore_without_until() {
        let cli = Cli::parse_from(["bunch", "restore", "--no-backup"]);
        match cli.command {
            Some(Commands::Restore {
                until, no_backup, ..
            }) => {
                assert_eq!(until, None);
                assert!(no_backup);
            }
            _ => panic!("Expected Restore command"),
        }
    }

    #[test]
    fn parse_stats_ls() {
        let cli = Cli::parse_from(["bunch", "stats", "src", "--ls"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Stats { ls: true, ref path, .. }) if path == &Some(PathBuf::from("src"))
        ));
    }

    #[test]
    fn parse_log_options() {
        let cli = Cli::parse_from(["bunch", "log", "--after", "2.weeks.ago", "--last", "3"]);
        match cli.command {
            Some(Commands::Log { since, last, json }) => {
                assert_eq!(since, Some("2.weeks.ago".to_string()));
                assert_eq!(last, Some(3));
                assert!(!json);
            }
            _ => panic!("Expected Log command"),
        }
    }

    #[test]
    fn parse_log_rejects_zero_last() {
        assert!(Cli::try_parse_from(["bunch", "log", "--last", "0"]).is_err());
    }

    #[test]
    fn reduce_mode_maps_to_action() {
        assert_eq!(ReduceAction::from(ReduceMode::Delete), ReduceAction::Delete);
    }
}
