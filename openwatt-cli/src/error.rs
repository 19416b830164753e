//! CLI error types and exit codes.

use openwatt_core::{ConfigError, SessionError, TransportError};

/// Exit codes for CLI operations
pub mod exit_codes {
    /// General error - configuration, validation, or other non-connection errors
    pub const GENERAL_ERROR: i32 = 1;
    /// Connection failure - endpoint unknown, unreachable, or a command
    /// could not be delivered
    pub const CONNECTION_FAILURE: i32 = 2;
}

/// CLI error type
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Endpoint not found
    #[error("Endpoint not found: {0}")]
    EndpointNotFound(String),

    /// Connection test failed
    #[error("Connection test failed: {0}")]
    TestFailed(String),

    /// Transport failure while running a command
    #[error("Transport error: {0}")]
    Transport(String),

    /// The device rejected a command
    #[error("Command failed: {0}")]
    Command(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation(msg) => Self::Validation(msg),
            ConfigError::NotFound(what) => Self::EndpointNotFound(what),
            other => Self::Config(other.to_string()),
        }
    }
}

impl From<SessionError> for CliError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::EndpointNotFound(id) => Self::EndpointNotFound(id.to_string()),
        }
    }
}

impl From<TransportError> for CliError {
    fn from(err: TransportError) -> Self {
        Self::Transport(err.to_string())
    }
}

impl CliError {
    /// Returns the appropriate exit code for this error type.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: General error (configuration, validation, rejected command, IO)
    /// - 2: Connection failure (test failed, endpoint not found, transport)
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::TestFailed(_) | Self::EndpointNotFound(_) | Self::Transport(_) => {
                exit_codes::CONNECTION_FAILURE
            }
            Self::Config(_) | Self::Validation(_) | Self::Command(_) | Self::Io(_) => {
                exit_codes::GENERAL_ERROR
            }
        }
    }
}
