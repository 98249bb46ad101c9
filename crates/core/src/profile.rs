//! Profile management
//!
//! Profiles are named S3-compatible endpoints stored in the config file,
//! including connection details and credentials.

use serde::{Deserialize, Serialize};

use crate::config::ConfigManager;
use crate::error::{Error, Result};

/// Bucket lookup styles accepted in a profile
pub const BUCKET_LOOKUP_STYLES: &[&str] = &["auto", "path", "dns"];

/// Retry configuration for a profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Initial backoff duration in milliseconds
    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff duration in milliseconds
    #[serde(default = "default_max_backoff")]
    pub max_backoff_ms: u64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_backoff() -> u64 {
    100
}

fn default_max_backoff() -> u64 {
    10000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff(),
            max_backoff_ms: default_max_backoff(),
        }
    }
}

/// Timeout configuration for a profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Connection timeout in milliseconds
    #[serde(default = "default_connect_timeout")]
    pub connect_ms: u64,

    /// Read timeout in milliseconds
    #[serde(default = "default_read_timeout")]
    pub read_ms: u64,
}

fn default_connect_timeout() -> u64 {
    5000
}

fn default_read_timeout() -> u64 {
    30000
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_ms: default_connect_timeout(),
            read_ms: default_read_timeout(),
        }
    }
}

/// A profile represents a named S3-compatible storage endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Unique name for this profile
    pub name: String,

    /// S3 endpoint URL
    pub endpoint: String,

    /// Access key ID
    pub access_key: String,

    /// Secret access key
    pub secret_key: String,

    /// Session token for temporary credentials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,

    /// AWS region
    #[serde(default = "default_region")]
    pub region: String,

    /// Bucket lookup style: "auto", "path", or "dns"
    #[serde(default = "default_bucket_lookup")]
    pub bucket_lookup: String,

    /// Retry configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetryConfig>,

    /// Timeout configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<TimeoutConfig>,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_bucket_lookup() -> String {
    "auto".to_string()
}

impl Profile {
    /// Create a new profile with required fields
    pub fn new(
        name: impl Into<String>,
        endpoint: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            session_token: None,
            region: default_region(),
            bucket_lookup: default_bucket_lookup(),
            retry: None,
            timeout: None,
        }
    }

    /// Whether requests put the bucket in the path instead of the host
    ///
    /// Only "dns" selects virtual-hosted addressing; S3-compatible servers
    /// generally expect path style.
    pub fn force_path_style(&self) -> bool {
        self.bucket_lookup != "dns"
    }

    /// Get the effective retry configuration
    pub fn retry_config(&self) -> RetryConfig {
        self.retry.clone().unwrap_or_default()
    }

    /// Get the effective timeout configuration
    pub fn timeout_config(&self) -> TimeoutConfig {
        self.timeout.clone().unwrap_or_default()
    }
}

/// Manager for profile operations
pub struct ProfileManager {
    config_manager: ConfigManager,
}

impl ProfileManager {
    /// Create a new ProfileManager with a specific ConfigManager
    pub fn with_config_manager(config_manager: ConfigManager) -> Self {
        Self { config_manager }
    }

    /// Create a new ProfileManager using the default config location
    pub fn new() -> Result<Self> {
        let config_manager = ConfigManager::new()?;
        Ok(Self { config_manager })
    }

    /// List all configured profiles
    pub fn list(&self) -> Result<Vec<Profile>> {
        let config = self.config_manager.load()?;
        Ok(config.profiles)
    }

    /// Get a profile by name
    pub fn get(&self, name: &str) -> Result<Profile> {
        let config = self.config_manager.load()?;
        config
            .profiles
            .into_iter()
            .find(|p| p.name == name)
            .ok_or_else(|| Error::ProfileNotFound(name.to_string()))
    }

    /// Add or update a profile
    pub fn set(&self, profile: Profile) -> Result<()> {
        let mut config = self.config_manager.load()?;

        config.profiles.retain(|p| p.name != profile.name);
        config.profiles.push(profile);

        self.config_manager.save(&config)
    }

    /// Remove a profile
    pub fn remove(&self, name: &str) -> Result<()> {
        let mut config = self.config_manager.load()?;
        let original_len = config.profiles.len();

        config.profiles.retain(|p| p.name != name);

        if config.profiles.len() == original_len {
            return Err(Error::ProfileNotFound(name.to_string()));
        }

        self.config_manager.save(&config)
    }

    /// Check if a profile exists
    pub fn exists(&self, name: &str) -> Result<bool> {
        let config = self.config_manager.load()?;
        Ok(config.profiles.iter().any(|p| p.name == name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_profile_manager() -> (ProfileManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let config_manager = ConfigManager::with_path(config_path);
        let profile_manager = ProfileManager::with_config_manager(config_manager);
        (profile_manager, temp_dir)
    }

    #[test]
    fn test_profile_new() {
        let profile = Profile::new("test", "http://localhost:9000", "access", "secret");
        assert_eq!(profile.name, "test");
        assert_eq!(profile.endpoint, "http://localhost:9000");
        assert_eq!(profile.region, "us-east-1");
        assert_eq!(profile.bucket_lookup, "auto");
        assert!(profile.force_path_style());
        assert_eq!(profile.retry_config().max_attempts, 3);
        assert_eq!(profile.timeout_config().connect_ms, 5000);
    }

    #[test]
    fn test_session_token_persisted() {
        let (manager, temp_dir) = temp_profile_manager();
        manager
            .set(Profile::new("static", "http://localhost:9000", "a", "b"))
            .unwrap();
        let mut profile = Profile::new("sts", "https://s3.amazonaws.com", "a", "b");
        profile.session_token = Some("token".to_string());
        manager.set(profile).unwrap();

        assert_eq!(
            manager.get("sts").unwrap().session_token.as_deref(),
            Some("token")
        );
        assert_eq!(manager.get("static").unwrap().session_token, None);

        let saved = std::fs::read_to_string(temp_dir.path().join("config.toml")).unwrap();
        assert_eq!(saved.matches("session_token").count(), 1);
    }

    #[test]
    fn test_dns_lookup_uses_virtual_hosts() {
        let mut profile = Profile::new("aws", "https://s3.amazonaws.com", "a", "b");
        profile.bucket_lookup = "dns".to_string();
        assert!(!profile.force_path_style());
    }

    #[test]
    fn test_profile_manager_set_and_get() {
        let (manager, _temp_dir) = temp_profile_manager();

        let profile = Profile::new("minio", "http://localhost:9000", "minioadmin", "minioadmin");
        manager.set(profile).unwrap();

        let retrieved = manager.get("minio").unwrap();
        assert_eq!(retrieved.name, "minio");
        assert_eq!(retrieved.endpoint, "http://localhost:9000");
    }

    #[test]
    fn test_profile_manager_list() {
        let (manager, _temp_dir) = temp_profile_manager();

        manager
            .set(Profile::new("a", "http://a:9000", "a", "a"))
            .unwrap();
        manager
            .set(Profile::new("b", "http://b:9000", "b", "b"))
            .unwrap();

        let profiles = manager.list().unwrap();
        assert_eq!(profiles.len(), 2);
    }

    #[test]
    fn test_profile_manager_remove() {
        let (manager, _temp_dir) = temp_profile_manager();

        manager
            .set(Profile::new("test", "http://localhost:9000", "a", "b"))
            .unwrap();
        assert!(manager.exists("test").unwrap());

        manager.remove("test").unwrap();
        assert!(!manager.exists("test").unwrap());
    }

    #[test]
    fn test_profile_manager_remove_not_found() {
        let (manager, _temp_dir) = temp_profile_manager();

        let result = manager.remove("nonexistent");
        assert!(matches!(result, Err(Error::ProfileNotFound(_))));
    }

    #[test]
    fn test_profile_manager_get_not_found() {
        let (manager, _temp_dir) = temp_profile_manager();

        let result = manager.get("nonexistent");
        assert!(matches!(result, Err(Error::ProfileNotFound(_))));
    }

    #[test]
    fn test_profile_update_existing() {
        let (manager, _temp_dir) = temp_profile_manager();

        manager
            .set(Profile::new("test", "http://old:9000", "a", "b"))
            .unwrap();
        manager
            .set(Profile::new("test", "http://new:9000", "c", "d"))
            .unwrap();

        let profiles = manager.list().unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].endpoint, "http://new:9000");
    }
}
