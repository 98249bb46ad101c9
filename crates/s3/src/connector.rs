//! Connectors for config-file profiles and shared AWS profiles

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use aws_runtime::env_config::file::{EnvConfigFileKind, EnvConfigFiles};
use aws_types::os_shim_internal::{Env, Fs};
use s3nav_core::{
    ConfigManager, Connector, ConnectorLoader, Error, Profile, ProfileManager, Result,
    StorageClient,
};
use tokio::runtime::Runtime;

use crate::client::{ConnectSettings, S3Client};

/// A profile from the s3nav config file
pub struct ProfileConnector {
    profile: Profile,
    runtime: Arc<Runtime>,
}

impl ProfileConnector {
    pub fn new(profile: Profile, runtime: Arc<Runtime>) -> Self {
        Self { profile, runtime }
    }
}

impl Connector for ProfileConnector {
    fn name(&self) -> &str {
        &self.profile.name
    }

    fn kind(&self) -> &str {
        "profile"
    }

    fn create_client(&self) -> Result<Arc<dyn StorageClient>> {
        let settings = ConnectSettings::Profile(self.profile.clone());
        let client = S3Client::connect(&settings, Arc::clone(&self.runtime))?;
        Ok(Arc::new(client))
    }
}

/// Loads the profiles stored in the s3nav config file
pub struct ProfileLoader {
    manager: ProfileManager,
    runtime: Arc<Runtime>,
}

impl ProfileLoader {
    pub fn new(config_manager: ConfigManager, runtime: Arc<Runtime>) -> Self {
        Self {
            manager: ProfileManager::with_config_manager(config_manager),
            runtime,
        }
    }
}

impl ConnectorLoader for ProfileLoader {
    fn load(&self) -> Result<Vec<Arc<dyn Connector>>> {
        Ok(self
            .manager
            .list()?
            .into_iter()
            .map(|profile| {
                let connector = ProfileConnector::new(profile, Arc::clone(&self.runtime));
                Arc::new(connector) as Arc<dyn Connector>
            })
            .collect())
    }
}

/// A profile of the shared AWS config files
pub struct AwsProfileConnector {
    name: String,
    runtime: Arc<Runtime>,
}

impl AwsProfileConnector {
    pub fn new(name: impl Into<String>, runtime: Arc<Runtime>) -> Self {
        Self {
            name: name.into(),
            runtime,
        }
    }
}

impl Connector for AwsProfileConnector {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &str {
        "aws"
    }

    fn create_client(&self) -> Result<Arc<dyn StorageClient>> {
        let settings = ConnectSettings::AwsProfile(self.name.clone());
        let client = S3Client::connect(&settings, Arc::clone(&self.runtime))?;
        Ok(Arc::new(client))
    }
}

/// Lists the profiles of `~/.aws/config` and `~/.aws/credentials`
///
/// `AWS_CONFIG_FILE` and `AWS_SHARED_CREDENTIALS_FILE` override the paths.
/// Missing files contribute no profiles.
pub struct AwsProfileLoader {
    config_file: Option<PathBuf>,
    credentials_file: Option<PathBuf>,
    runtime: Arc<Runtime>,
}

impl AwsProfileLoader {
    pub fn new(runtime: Arc<Runtime>) -> Self {
        let aws_dir = dirs::home_dir().map(|home| home.join(".aws"));
        let from_env = |var: &str, file: &str| {
            std::env::var_os(var)
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
                .or_else(|| aws_dir.as_ref().map(|dir| dir.join(file)))
        };
        Self {
            config_file: from_env("AWS_CONFIG_FILE", "config"),
            credentials_file: from_env("AWS_SHARED_CREDENTIALS_FILE", "credentials"),
            runtime,
        }
    }

    /// Loader reading the given files (useful for testing)
    pub fn with_files(
        config_file: PathBuf,
        credentials_file: PathBuf,
        runtime: Arc<Runtime>,
    ) -> Self {
        Self {
            config_file: Some(config_file),
            credentials_file: Some(credentials_file),
            runtime,
        }
    }
}

fn read_optional(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) if path.exists() => Ok(std::fs::read_to_string(path)?),
        _ => Ok(String::new()),
    }
}

impl ConnectorLoader for AwsProfileLoader {
    fn load(&self) -> Result<Vec<Arc<dyn Connector>>> {
        let config = read_optional(self.config_file.as_ref())?;
        let credentials = read_optional(self.credentials_file.as_ref())?;
        let names = profile_names(&self.runtime, &config, &credentials)?;
        tracing::debug!(count = names.len(), "found AWS profiles");

        Ok(names
            .into_iter()
            .map(|name| {
                let connector = AwsProfileConnector::new(name, Arc::clone(&self.runtime));
                Arc::new(connector) as Arc<dyn Connector>
            })
            .collect())
    }
}

/// Profile names declared in the shared config and credentials files, sorted
///
/// The config file names profiles `[profile name]` except for `[default]`;
/// the credentials file uses plain `[name]` headers. Sections the SDK would
/// ignore are left out.
pub fn profile_names(runtime: &Runtime, config: &str, credentials: &str) -> Result<Vec<String>> {
    let files = EnvConfigFiles::builder()
        .with_contents(EnvConfigFileKind::Config, config)
        .with_contents(EnvConfigFileKind::Credentials, credentials)
        .build();
    let fs = Fs::from_slice(&[]);
    let env = Env::from_slice(&[]);
    let load = aws_config::profile::load(&fs, &env, &files, None);
    let profiles = runtime
        .block_on(load)
        .map_err(|e| Error::Config(format!("invalid AWS profile files: {e}")))?;

    let names: BTreeSet<&str> = profiles.profiles().collect();
    Ok(names.into_iter().map(str::to_string).collect())
}
