//! Wire types for the command execution endpoint

use serde::{Deserialize, Serialize};

/// Body of `POST /api/cli/execute`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRequest {
    /// Free-text command line
    pub command: String,
}

impl CommandRequest {
    /// Builds a request, rejecting blank commands
    #[must_use]
    pub fn new(command: &str) -> Option<Self> {
        if command.trim().is_empty() {
            None
        } else {
            Some(Self {
                command: command.to_string(),
            })
        }
    }
}

/// Successful response of `POST /api/cli/execute`
///
/// `output` is required; `exitCode` defaults to 0 and `error` to `null`
/// when the device leaves them out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResponse {
    /// Text printed by the command
    pub output: String,
    /// Exit code reported by the device
    #[serde(rename = "exitCode", default)]
    pub exit_code: i32,
    /// Structured error reported by the device
    #[serde(default)]
    pub error: Option<String>,
}

impl CommandResponse {
    /// Returns true when the device reported a structured error
    #[must_use]
    pub const fn has_error(&self) -> bool {
        self.error.is_some()
    }
}
