//! Transport client for remote endpoints
//!
//! A transport sends one command to one endpoint and returns either the
//! decoded [`CommandResponse`] or a typed [`TransportError`]. It never
//! retries; retry policy belongs to callers (the monitor retries through
//! its polling cadence, the console does not retry at all).

mod client;
mod error;

use async_trait::async_trait;

use crate::models::{CommandResponse, Endpoint};

pub use client::{DEFAULT_TIMEOUT_SECS, HttpTransport, TransportConfig};
pub use error::{TransportError, TransportResult};

/// Path of the command execution endpoint
pub const EXECUTE_PATH: &str = "/api/cli/execute";

/// Path of the health endpoint
pub const HEALTH_PATH: &str = "/api/health";

/// Command used to query device status
pub const SYSINFO_COMMAND: &str = "/system/sysinfo";

/// Something that can run commands on an endpoint
///
/// [`HttpTransport`] is the production implementation; tests substitute
/// scripted transports.
#[async_trait]
pub trait CommandTransport: Send + Sync {
    /// Executes a single command on the endpoint
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] describing why no usable response was
    /// obtained.
    async fn execute(
        &self,
        endpoint: &Endpoint,
        command: &str,
    ) -> TransportResult<CommandResponse>;

    /// Checks that the endpoint answers its health path with a 2xx status
    ///
    /// # Errors
    ///
    /// Returns the same failure taxonomy as [`CommandTransport::execute`].
    async fn probe(&self, endpoint: &Endpoint) -> TransportResult<()>;
}
