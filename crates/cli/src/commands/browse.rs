//! The interactive browser

use std::rc::Rc;
use std::sync::Arc;

use s3nav_core::{Config, ConfigManager, ConnectorLoader, Editor, MemoryLoader};
use s3nav_s3::{AwsProfileLoader, ProfileLoader};
use tokio::runtime::Runtime;

use crate::exit_code::ExitCode;
use crate::ui;

/// Options of the interactive browser
#[derive(clap::Args, Debug, Default)]
pub struct BrowseArgs {
    /// Command used to edit and create objects
    #[arg(long, env = "EDITOR", value_name = "COMMAND")]
    pub editor: Option<String>,

    /// Command used to view objects
    #[arg(long, env = "PAGER", value_name = "COMMAND")]
    pub viewer: Option<String>,

    /// Offer the in-memory demo backend
    #[arg(long, hide = true)]
    pub memory: bool,
}

/// Run the browser until the user quits
pub fn execute(args: &BrowseArgs, config_manager: ConfigManager) -> ExitCode {
    let config = match config_manager.load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from_error(&e);
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => Arc::new(runtime),
        Err(e) => {
            eprintln!("Error: failed to start runtime: {e}");
            return ExitCode::GeneralError;
        }
    };

    let editor = Rc::new(editor(args, &config));
    let loaders = connector_loaders(args, &config, &config_manager, &runtime);
    tracing::info!(loaders = loaders.len(), "starting browser");

    match ui::run(editor, loaders) {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::GeneralError
        }
    }
}

/// Editor and viewer from the flags, falling back to the config defaults
pub fn editor(args: &BrowseArgs, config: &Config) -> Editor {
    let pick = |flag: &Option<String>, default: &str| -> String {
        flag.as_deref()
            .map(str::trim)
            .filter(|command| !command.is_empty())
            .unwrap_or(default)
            .to_string()
    };
    Editor::new(
        &pick(&args.editor, &config.defaults.editor),
        &pick(&args.viewer, &config.defaults.viewer),
    )
}

/// Loaders enabled by the config, plus the memory loader for `--memory`
pub fn connector_loaders(
    args: &BrowseArgs,
    config: &Config,
    config_manager: &ConfigManager,
    runtime: &Arc<Runtime>,
) -> Vec<Box<dyn ConnectorLoader>> {
    let mut loaders: Vec<Box<dyn ConnectorLoader>> = Vec::new();
    if config.loaders.profiles {
        loaders.push(Box::new(ProfileLoader::new(
            config_manager.clone(),
            Arc::clone(runtime),
        )));
    }
    if config.loaders.aws {
        loaders.push(Box::new(AwsProfileLoader::new(Arc::clone(runtime))));
    }
    if config.loaders.memory || args.memory {
        loaders.push(Box::new(MemoryLoader));
    }
    loaders
}
