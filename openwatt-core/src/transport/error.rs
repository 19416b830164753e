//! Transport failure taxonomy

use std::error::Error as _;

use thiserror::Error;

/// Why a transport call did not produce a usable response
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// DNS, connect, TLS or timeout fault
    #[error("{0}")]
    NetworkError(String),

    /// The endpoint answered with a non-2xx status
    #[error("HTTP {code}: {reason}")]
    HttpStatus {
        /// Status code
        code: u16,
        /// Canonical reason phrase
        reason: String,
    },

    /// A body was expected but none was sent
    #[error("Empty response body")]
    EmptyBody,

    /// The body could not be decoded
    #[error("Malformed response: {0}")]
    DecodeError(String),
}

/// Result type alias for transport operations
pub type TransportResult<T> = std::result::Result<T, TransportError>;

impl TransportError {
    /// Builds an `HttpStatus` error from a status code
    #[must_use]
    pub fn http_status(code: u16) -> Self {
        let reason = reqwest::StatusCode::from_u16(code)
            .ok()
            .and_then(|status| status.canonical_reason())
            .unwrap_or("Unknown")
            .to_string();
        Self::HttpStatus { code, reason }
    }

    /// Returns the HTTP status code, if the endpoint sent one
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Returns true for faults below the HTTP layer
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::NetworkError(_))
    }

    /// Maps a `reqwest` error, keeping the innermost cause in the message
    pub(crate) fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::DecodeError(describe(err));
        }
        if err.is_timeout() {
            return Self::NetworkError(format!("Request timed out: {}", describe(err)));
        }
        Self::NetworkError(describe(err))
    }
}

/// Joins the error and its sources, skipping repeated messages
fn describe(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
