//! Error types for s3nav-core
//!
//! Provides a unified error type shared by storage backends, pages and the
//! navigation controller. Every error can be shown in an error dialog
//! (`title()` plus `Display`) and converted to an exit code.

use thiserror::Error;

/// Result type alias for s3nav-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for s3nav-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid path or key format
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// User input rejected before any backend call
    #[error("{0}")]
    Validation(String),

    /// Profile not found
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    /// Profile already exists
    #[error("Profile already exists: {0}")]
    ProfileExists(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Authentication error
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Resource not found
    #[error("{0}")]
    NotFound(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// Conflict error
    #[error("{0}")]
    Conflict(String),

    /// Operation failure reported by a storage backend
    #[error("{message}")]
    Backend { operation: String, message: String },

    /// Feature not supported by backend
    #[error("Unsupported feature: {0}")]
    Unsupported(String),

    /// External editor or viewer failed to launch or exited non-zero
    #[error("External program failed: {0}")]
    Process(String),

    /// The UI could not be suspended for an external program
    #[error("Application could not be suspended: {0}")]
    Suspend(String),

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Short heading used by the error dialog
    pub fn title(&self) -> String {
        match self {
            Error::Config(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_)
            | Error::Json(_) => "Configuration".to_string(),
            Error::InvalidPath(_) | Error::InvalidUrl(_) | Error::Validation(_) => {
                "Invalid Input".to_string()
            }
            Error::ProfileNotFound(_) | Error::ProfileExists(_) => "Profile".to_string(),
            Error::Io(_) => "I/O Error".to_string(),
            Error::Auth(_) => "Access Denied".to_string(),
            Error::NotFound(_) => "Not Found".to_string(),
            Error::Network(_) => "Network Error".to_string(),
            Error::Conflict(_) => "Conflict".to_string(),
            Error::Backend { operation, .. } => operation.clone(),
            Error::Unsupported(_) => "Unsupported".to_string(),
            Error::Process(_) | Error::Suspend(_) => "External Program".to_string(),
            Error::General(_) => "Unknown Error".to_string(),
        }
    }

    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidPath(_) | Error::Validation(_) => 2, // UsageError
            Error::Config(_) | Error::TomlParse(_) => 2,      // UsageError
            Error::Network(_) => 3,                           // NetworkError
            Error::Auth(_) => 4,                              // AuthError
            Error::NotFound(_) | Error::ProfileNotFound(_) => 5, // NotFound
            Error::Conflict(_) | Error::ProfileExists(_) => 6, // Conflict
            Error::Unsupported(_) => 7,                       // UnsupportedFeature
            _ => 1,                                           // GeneralError
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(Error::InvalidPath("test".into()).exit_code(), 2);
        assert_eq!(Error::Validation("test".into()).exit_code(), 2);
        assert_eq!(Error::Config("test".into()).exit_code(), 2);
        assert_eq!(Error::Network("test".into()).exit_code(), 3);
        assert_eq!(Error::Auth("test".into()).exit_code(), 4);
        assert_eq!(Error::NotFound("test".into()).exit_code(), 5);
        assert_eq!(Error::ProfileNotFound("test".into()).exit_code(), 5);
        assert_eq!(Error::Conflict("test".into()).exit_code(), 6);
        assert_eq!(Error::ProfileExists("test".into()).exit_code(), 6);
        assert_eq!(Error::Unsupported("test".into()).exit_code(), 7);
        assert_eq!(Error::General("test".into()).exit_code(), 1);
        assert_eq!(Error::Process("test".into()).exit_code(), 1);
    }

    #[test]
    fn test_error_display() {
        let err = Error::ProfileNotFound("minio".into());
        assert_eq!(err.to_string(), "Profile not found: minio");

        let err = Error::NotFound("bucket not found".into());
        assert_eq!(err.to_string(), "bucket not found");
    }

    #[test]
    fn test_backend_error_title_is_operation() {
        let err = Error::Backend {
            operation: "ListObjectsV2".into(),
            message: "SlowDown".into(),
        };
        assert_eq!(err.title(), "ListObjectsV2");
        assert_eq!(err.to_string(), "SlowDown");
    }

    #[test]
    fn test_validation_title() {
        let err = Error::Validation("bucket name cannot be empty".into());
        assert_eq!(err.title(), "Invalid Input");
    }
}
