//! HTTP implementation of [`CommandTransport`]

use std::time::Duration;

use async_trait::async_trait;

use super::error::{TransportError, TransportResult};
use super::{CommandTransport, EXECUTE_PATH, HEALTH_PATH};
use crate::models::{CommandRequest, CommandResponse, Endpoint};

/// Default connect/read/write timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 2;

/// Timeouts applied to every request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportConfig {
    /// Time allowed to establish the TCP/TLS connection
    pub connect_timeout: Duration,
    /// Time allowed between reads of the response
    pub read_timeout: Duration,
    /// Time allowed to send the request
    pub write_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        let timeout = Duration::from_secs(DEFAULT_TIMEOUT_SECS);
        Self {
            connect_timeout: timeout,
            read_timeout: timeout,
            write_timeout: timeout,
        }
    }
}

impl TransportConfig {
    /// Upper bound for a whole request.
    ///
    /// reqwest has no dedicated write timeout, so the request as a whole is
    /// capped at the sum of the three phases.
    #[must_use]
    pub fn total_timeout(&self) -> Duration {
        self.connect_timeout + self.read_timeout + self.write_timeout
    }
}

/// Sends commands to endpoints over HTTP(S) with JSON bodies
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    config: TransportConfig,
}

impl HttpTransport {
    /// Creates a transport with the given timeouts
    ///
    /// # Errors
    ///
    /// Returns `TransportError::NetworkError` if the HTTP client (TLS
    /// backend included) cannot be initialized.
    pub fn new(config: TransportConfig) -> TransportResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .timeout(config.total_timeout())
            .user_agent(concat!("openwatt/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::from_reqwest(&e))?;

        Ok(Self { client, config })
    }

    /// Returns the configured timeouts
    #[must_use]
    pub const fn config(&self) -> &TransportConfig {
        &self.config
    }
}

#[async_trait]
impl CommandTransport for HttpTransport {
    async fn execute(
        &self,
        endpoint: &Endpoint,
        command: &str,
    ) -> TransportResult<CommandResponse> {
        let url = endpoint.url(EXECUTE_PATH);
        let request = CommandRequest {
            command: command.to_string(),
        };

        tracing::debug!(endpoint = %endpoint.name, %url, command, "Executing remote command");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(&e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(endpoint = %endpoint.name, status = status.as_u16(), "Command rejected");
            return Err(TransportError::http_status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::from_reqwest(&e))?;

        decode_response(&body)
    }

    async fn probe(&self, endpoint: &Endpoint) -> TransportResult<()> {
        let url = endpoint.url(HEALTH_PATH);
        tracing::debug!(endpoint = %endpoint.name, %url, "Probing endpoint health");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(&e))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(TransportError::http_status(status.as_u16()))
        }
    }
}

/// Decodes the body of a 2xx execute response
pub(crate) fn decode_response(body: &[u8]) -> TransportResult<CommandResponse> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(TransportError::EmptyBody);
    }
    serde_json::from_slice(body).map_err(|e| TransportError::DecodeError(e.to_string()))
}
