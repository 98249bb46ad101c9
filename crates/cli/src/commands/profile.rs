//! Profile management commands
//!
//! Profiles are named S3-compatible endpoints with credentials, stored in the
//! config file and offered on the browser's first page.

use clap::Subcommand;
use clap::builder::PossibleValuesParser;
use s3nav_core::{BUCKET_LOOKUP_STYLES, Error, Profile, ProfileManager, Result};

use crate::exit_code::ExitCode;

/// Profile subcommands
#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Add or update a profile
    Add(AddArgs),

    /// List all configured profiles
    List(ListArgs),

    /// Remove a profile
    Remove(RemoveArgs),
}

/// Arguments for the `profile add` command
#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Profile name (e.g., "local", "minio")
    pub name: String,

    /// S3 endpoint URL (e.g., "http://localhost:9000")
    pub endpoint: String,

    /// Access key ID
    pub access_key: String,

    /// Secret access key
    pub secret_key: String,

    /// Session token for temporary credentials
    #[arg(long)]
    pub session_token: Option<String>,

    /// Region used for signing and bucket creation
    #[arg(long, default_value = "us-east-1")]
    pub region: String,

    /// Bucket addressing: auto, path, or dns
    #[arg(
        long,
        default_value = "auto",
        value_parser = PossibleValuesParser::new(BUCKET_LOOKUP_STYLES.iter().copied())
    )]
    pub bucket_lookup: String,
}

/// Arguments for the `profile list` command
#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Show region and bucket lookup too
    #[arg(short, long)]
    pub long: bool,
}

/// Arguments for the `profile remove` command
#[derive(clap::Args, Debug)]
pub struct RemoveArgs {
    /// Name of the profile to remove
    pub name: String,
}

/// Execute a profile subcommand
pub fn execute(cmd: ProfileCommands, manager: &ProfileManager) -> ExitCode {
    let result = match cmd {
        ProfileCommands::Add(args) => add(args, manager),
        ProfileCommands::List(args) => list(&args, manager),
        ProfileCommands::Remove(args) => remove(&args, manager),
    };

    match result {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
            ExitCode::Success
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from_error(&e)
        }
    }
}

fn add(args: AddArgs, manager: &ProfileManager) -> Result<Vec<String>> {
    if args.name.trim().is_empty() {
        return Err(Error::Validation("profile name cannot be empty".into()));
    }
    if args.endpoint.trim().is_empty() {
        return Err(Error::Validation("endpoint URL cannot be empty".into()));
    }

    let mut profile = Profile::new(
        &args.name,
        &args.endpoint,
        &args.access_key,
        &args.secret_key,
    );
    profile.session_token = args.session_token;
    profile.region = args.region;
    profile.bucket_lookup = args.bucket_lookup;
    manager.set(profile)?;

    tracing::info!(profile = %args.name, "profile saved");
    Ok(vec![format!("Profile '{}' configured successfully.", args.name)])
}

fn list(args: &ListArgs, manager: &ProfileManager) -> Result<Vec<String>> {
    let profiles = manager.list()?;
    if profiles.is_empty() {
        return Ok(vec!["No profiles configured.".to_string()]);
    }

    Ok(profiles
        .iter()
        .map(|profile| {
            if args.long {
                format!(
                    "{:<12} {} (region: {}, lookup: {})",
                    profile.name, profile.endpoint, profile.region, profile.bucket_lookup
                )
            } else {
                format!("{:<12} {}", profile.name, profile.endpoint)
            }
        })
        .collect())
}

fn remove(args: &RemoveArgs, manager: &ProfileManager) -> Result<Vec<String>> {
    manager.remove(&args.name)?;
    tracing::info!(profile = %args.name, "profile removed");
    Ok(vec![format!("Profile '{}' removed successfully.", args.name)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Cli;
    use clap::Parser;
    use s3nav_core::ConfigManager;
    use tempfile::TempDir;

    fn temp_manager() -> (ProfileManager, TempDir) {
        let dir = TempDir::new().unwrap();
        let config = ConfigManager::with_path(dir.path().join("config.toml"));
        (ProfileManager::with_config_manager(config), dir)
    }

    fn add_args(name: &str) -> AddArgs {
        AddArgs {
            name: name.to_string(),
            endpoint: "http://localhost:9000".to_string(),
            access_key: "accesskey".to_string(),
            secret_key: "secretkey".to_string(),
            session_token: None,
            region: "us-east-1".to_string(),
            bucket_lookup: "path".to_string(),
        }
    }

    #[test]
    fn test_add_defaults_from_cli() {
        let cli =
            Cli::try_parse_from(["s3nav", "profile", "add", "local", "http://h:9000", "a", "b"])
                .unwrap();
        let Some(crate::commands::Commands::Profile(ProfileCommands::Add(args))) = cli.command
        else {
            panic!("expected profile add");
        };
        assert_eq!(args.region, "us-east-1");
        assert_eq!(args.bucket_lookup, "auto");
    }

    #[test]
    fn test_add_rejects_unknown_lookup() {
        let result = Cli::try_parse_from([
            "s3nav",
            "profile",
            "add",
            "local",
            "http://h:9000",
            "a",
            "b",
            "--bucket-lookup",
            "virtual",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_add_then_list() {
        let (manager, _dir) = temp_manager();
        add(add_args("local"), &manager).unwrap();

        let lines = list(&ListArgs { long: true }, &manager).unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("local"));
        assert!(lines[0].contains("lookup: path"));

        let short = list(&ListArgs { long: false }, &manager).unwrap();
        assert_eq!(short[0], "local        http://localhost:9000");
    }

    #[test]
    fn test_add_with_session_token() {
        let cli = Cli::try_parse_from([
            "s3nav",
            "profile",
            "add",
            "sts",
            "https://s3.amazonaws.com",
            "a",
            "b",
            "--session-token",
            "token",
        ])
        .unwrap();
        let Some(crate::commands::Commands::Profile(ProfileCommands::Add(args))) = cli.command
        else {
            panic!("expected profile add");
        };

        let (manager, _dir) = temp_manager();
        add(args, &manager).unwrap();
        assert_eq!(
            manager.get("sts").unwrap().session_token.as_deref(),
            Some("token")
        );
    }

    #[test]
    fn test_add_empty_name() {
        let (manager, _dir) = temp_manager();
        let err = add(add_args("  "), &manager).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(manager.list().unwrap().is_empty());
    }

    #[test]
    fn test_list_empty() {
        let (manager, _dir) = temp_manager();
        let lines = list(&ListArgs { long: false }, &manager).unwrap();
        assert_eq!(lines, vec!["No profiles configured."]);
    }

    #[test]
    fn test_remove_missing_profile() {
        let (manager, _dir) = temp_manager();
        let args = RemoveArgs {
            name: "ghost".into(),
        };
        let err = remove(&args, &manager).unwrap_err();
        assert_eq!(ExitCode::from_error(&err), ExitCode::NotFound);
    }

    #[test]
    fn test_remove_profile() {
        let (manager, _dir) = temp_manager();
        add(add_args("local"), &manager).unwrap();
        let args = RemoveArgs {
            name: "local".into(),
        };
        remove(&args, &manager).unwrap();
        assert!(!manager.exists("local").unwrap());
    }
}
