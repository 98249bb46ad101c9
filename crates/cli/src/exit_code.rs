//! Exit code definitions for the s3nav binary

use s3nav_core::Error;

/// Exit codes of the s3nav binary
///
/// Scripts driving `s3nav profile ...` can rely on these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Operation completed successfully
    Success = 0,

    /// General/unspecified error
    GeneralError = 1,

    /// User input error: invalid arguments, malformed config, etc.
    UsageError = 2,

    /// Network error: timeout, connection reset, etc.
    NetworkError = 3,

    /// Authentication or permission failure
    AuthError = 4,

    /// Resource not found: profile, bucket or object does not exist
    NotFound = 5,

    /// Conflict: profile already exists, bucket not empty, etc.
    Conflict = 6,

    /// Backend does not support this feature
    UnsupportedFeature = 7,
}

impl ExitCode {
    /// Convert exit code to i32 for use with std::process::exit
    #[inline]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Create exit code from i32 value
    pub const fn from_i32(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Success),
            1 => Some(Self::GeneralError),
            2 => Some(Self::UsageError),
            3 => Some(Self::NetworkError),
            4 => Some(Self::AuthError),
            5 => Some(Self::NotFound),
            6 => Some(Self::Conflict),
            7 => Some(Self::UnsupportedFeature),
            _ => None,
        }
    }

    /// Exit code reported for a failed operation
    pub fn from_error(err: &Error) -> Self {
        Self::from_i32(err.exit_code()).unwrap_or(Self::GeneralError)
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Success => "Operation completed successfully",
            Self::GeneralError => "General error",
            Self::UsageError => "Invalid arguments or configuration",
            Self::NetworkError => "Network error",
            Self::AuthError => "Authentication or permission failure",
            Self::NotFound => "Resource not found",
            Self::Conflict => "Conflict",
            Self::UnsupportedFeature => "Feature not supported by backend",
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.as_i32()
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.description(), self.as_i32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_from_i32() {
        assert_eq!(ExitCode::from_i32(0), Some(ExitCode::Success));
        assert_eq!(ExitCode::from_i32(5), Some(ExitCode::NotFound));
        assert_eq!(ExitCode::from_i32(7), Some(ExitCode::UnsupportedFeature));
        assert_eq!(ExitCode::from_i32(130), None);
    }

    #[test]
    fn test_exit_code_from_error() {
        assert_eq!(
            ExitCode::from_error(&Error::ProfileNotFound("x".into())),
            ExitCode::NotFound
        );
        assert_eq!(
            ExitCode::from_error(&Error::Network("reset".into())),
            ExitCode::NetworkError
        );
        assert_eq!(
            ExitCode::from_error(&Error::Validation("empty".into())),
            ExitCode::UsageError
        );
        assert_eq!(
            ExitCode::from_error(&Error::Process("vim".into())),
            ExitCode::GeneralError
        );
    }

    #[test]
    fn test_exit_code_display() {
        let display = ExitCode::NotFound.to_string();
        assert!(display.contains("5"));
        assert!(display.contains("not found"));

        let code: i32 = ExitCode::Conflict.into();
        assert_eq!(code, 6);
    }
}
