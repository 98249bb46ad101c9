//! CLI command definitions and execution
//!
//! Without a subcommand the interactive browser is started; `profile` and
//! `completions` run non-interactively and exit.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use s3nav_core::{ConfigManager, ProfileManager};

use crate::exit_code::ExitCode;

pub mod browse;
mod completions;
mod profile;

/// s3nav - terminal browser for S3-compatible object storage
///
/// Navigate buckets and key prefixes, view and edit objects with your own
/// editor, and switch between storage profiles.
#[derive(Parser, Debug)]
#[command(name = "s3nav")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file to use instead of the default location
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write logs to this file (nothing is logged otherwise)
    #[arg(long, global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true, default_value = "false")]
    pub debug: bool,

    #[command(flatten)]
    pub browse: browse::BrowseArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage storage profiles
    #[command(subcommand)]
    Profile(profile::ProfileCommands),

    /// Generate shell completion scripts
    Completions(completions::CompletionsArgs),
}

/// Config manager for `--config`, or the default location
pub fn config_manager(path: Option<PathBuf>) -> s3nav_core::Result<ConfigManager> {
    match path {
        Some(path) => Ok(ConfigManager::with_path(path)),
        None => ConfigManager::new(),
    }
}

/// Execute the CLI command and return an exit code
pub fn execute(cli: Cli) -> ExitCode {
    let config_manager = match config_manager(cli.config) {
        Ok(manager) => manager,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from_error(&e);
        }
    };

    match cli.command {
        Some(Commands::Profile(cmd)) => {
            profile::execute(cmd, &ProfileManager::with_config_manager(config_manager))
        }
        Some(Commands::Completions(args)) => completions::execute(args),
        None => browse::execute(&cli.browse, config_manager),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_browses() {
        let cli = Cli::try_parse_from(["s3nav", "--config", "/tmp/s3nav.toml", "--debug"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.debug);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/s3nav.toml")));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "s3nav",
            "profile",
            "list",
            "--log-file",
            "/tmp/s3nav.log",
        ])
        .unwrap();
        assert!(matches!(cli.command, Some(Commands::Profile(_))));
        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/s3nav.log")));
    }

    #[test]
    fn test_editor_and_viewer_flags() {
        let cli = Cli::try_parse_from([
            "s3nav",
            "--editor",
            "code --wait",
            "--viewer",
            "bat",
            "--memory",
        ])
        .unwrap();
        assert_eq!(cli.browse.editor.as_deref(), Some("code --wait"));
        assert_eq!(cli.browse.viewer.as_deref(), Some("bat"));
        assert!(cli.browse.memory);
    }

    #[test]
    fn test_memory_flag_hidden_from_help() {
        let help = Cli::command().render_help().to_string();
        assert!(!help.contains("--memory"));
        assert!(help.contains("--editor"));
    }

    #[test]
    fn test_unknown_subcommand_rejected() {
        assert!(Cli::try_parse_from(["s3nav", "ls"]).is_err());
    }

    #[test]
    fn test_config_manager_uses_given_path() {
        let manager = config_manager(Some(PathBuf::from("/tmp/custom.toml"))).unwrap();
        assert_eq!(manager.config_path(), &PathBuf::from("/tmp/custom.toml"));
    }
}
