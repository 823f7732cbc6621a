//! CLI-specific error types and mappings.

use parlance_core::{CatalogError, SettingsError};
use parlance_session::SessionError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Argument validation error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The evaluation service failed or could not be reached.
    #[error("Service error: {0}")]
    Service(String),

    /// The requested resource does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Local audio setup failed.
    #[error("Audio error: {0}")]
    Audio(String),

    /// A session operation was refused.
    #[error("{0}")]
    Session(String),

    /// IO error (terminal input, etc.).
    #[error("IO error: {0}")]
    Io(String),
}

impl CliError {
    /// Map error to a process exit code (sysexits.h where one fits).
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Session(_) => 1,
            Self::Arguments(_) => 2, // EX_USAGE
            Self::NotFound(_) => 66, // EX_NOINPUT
            Self::Service(_) => 69,  // EX_UNAVAILABLE
            Self::Audio(_) => 71,    // EX_OSERR
            Self::Io(_) => 74,       // EX_IOERR
            Self::Config(_) => 78,   // EX_CONFIG
        }
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<CatalogError> for CliError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(_) => Self::NotFound(err.to_string()),
            other => Self::Service(other.to_string()),
        }
    }
}

impl From<SessionError> for CliError {
    fn from(err: SessionError) -> Self {
        Self::Session(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use parlance_core::ChallengeId;

    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::Arguments(String::new()).exit_code(), 2);
        assert_eq!(CliError::Config(String::new()).exit_code(), 78);
        assert_eq!(CliError::Service(String::new()).exit_code(), 69);
    }

    #[test]
    fn test_missing_challenge_maps_to_not_found() {
        let err = CliError::from(CatalogError::NotFound(ChallengeId(9)));
        assert!(matches!(err, CliError::NotFound(_)));
        assert_eq!(err.exit_code(), 66);
    }

    #[test]
    fn test_settings_error_display() {
        let err = CliError::from(SettingsError::EmptyApiUrl);
        assert_eq!(
            err.to_string(),
            "Configuration error: API base URL cannot be empty"
        );
    }
}
