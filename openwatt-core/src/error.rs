//! Error types for `OpenWatt`
//!
//! Transport failures live next to the transport in
//! [`crate::transport::TransportError`]; this module holds the errors shared
//! by the rest of the crate and the umbrella [`OpenWattError`].

use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

use crate::transport::TransportError;

/// Top-level error type for `OpenWatt`
#[derive(Debug, Error)]
pub enum OpenWattError {
    /// Configuration or persistence error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Transport error while talking to an endpoint
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Session error (console or monitor)
    #[error(transparent)]
    Session(#[from] SessionError),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised when a console session or monitor cannot be started
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The requested endpoint is not in the registry.
    ///
    /// This is terminal: the consumer should send the user back to
    /// registration instead of retrying.
    #[error("Endpoint not found: {0}")]
    EndpointNotFound(Uuid),
}

/// Result type alias for session operations
pub type SessionResult<T> = std::result::Result<T, SessionError>;

/// Errors related to configuration files and the endpoint store
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read or write a configuration file
    #[error("Failed to access '{path}': {source}")]
    Io {
        /// Path of the file that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a configuration file
    #[error("Failed to parse '{path}': {reason}")]
    Parse {
        /// Path of the file that failed to parse
        path: PathBuf,
        /// Parser message
        reason: String,
    },

    /// Failed to serialize configuration
    #[error("Failed to serialize configuration: {0}")]
    Serialize(String),

    /// Referenced record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid value supplied by the user
    #[error("Validation error: {0}")]
    Validation(String),

    /// No configuration directory could be determined
    #[error("Could not determine configuration directory")]
    NoConfigDir,
}

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
