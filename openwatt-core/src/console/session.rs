//! Console session bound to one endpoint

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::FutureExt;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::Instrument;
use uuid::Uuid;

use super::transcript::Transcript;
use crate::error::{SessionError, SessionResult};
use crate::models::{CommandRequest, CommandResponse, Endpoint};
use crate::registry::EndpointRegistry;
use crate::tracing::span_names;
use crate::transport::{CommandTransport, TransportError};

/// Number of unread error events kept per subscriber
pub const ERROR_EVENT_CAPACITY: usize = 16;

/// State published by a console session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsoleState {
    /// Display name of the endpoint
    pub endpoint_name: String,
    /// Everything written so far
    pub transcript: Transcript,
    /// True while a command is in flight
    pub busy: bool,
}

struct Inner {
    endpoint: Endpoint,
    transport: Arc<dyn CommandTransport>,
    state: watch::Sender<ConsoleState>,
    errors: broadcast::Sender<String>,
    closed: AtomicBool,
}

/// Interactive session for free-form command entry
///
/// Commands are strictly serialized: while one is in flight, further
/// submissions are dropped, not queued. Dropping the session discards the
/// result of a command that is still in flight.
pub struct ConsoleSession {
    inner: Arc<Inner>,
}

impl ConsoleSession {
    /// Opens a session for a registered endpoint
    ///
    /// The transcript starts with a banner naming the endpoint and its URL.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EndpointNotFound` if the endpoint is not
    /// registered; the session cannot proceed.
    pub fn initialize(
        registry: &dyn EndpointRegistry,
        transport: Arc<dyn CommandTransport>,
        id: Uuid,
    ) -> SessionResult<Self> {
        let endpoint = registry.resolve(id).ok_or_else(|| {
            tracing::warn!(%id, "Cannot open console: endpoint not registered");
            SessionError::EndpointNotFound(id)
        })?;
        Ok(Self::for_endpoint(endpoint, transport))
    }

    /// Opens a session for an endpoint snapshot
    #[must_use]
    pub fn for_endpoint(endpoint: Endpoint, transport: Arc<dyn CommandTransport>) -> Self {
        let mut transcript = Transcript::new();
        transcript.push(format!(
            "Connected to {} ({})\n",
            endpoint.name,
            endpoint.base_url()
        ));
        transcript.push("Type commands and press Enter\n\n");

        let (state, _) = watch::channel(ConsoleState {
            endpoint_name: endpoint.name.clone(),
            transcript,
            busy: false,
        });
        let (errors, _) = broadcast::channel(ERROR_EVENT_CAPACITY);

        tracing::debug!(endpoint = %endpoint.name, "Console session opened");

        Self {
            inner: Arc::new(Inner {
                endpoint,
                transport,
                state,
                errors,
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Returns the endpoint this session talks to
    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        &self.inner.endpoint
    }

    /// Subscribes to state changes
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ConsoleState> {
        self.inner.state.subscribe()
    }

    /// Subscribes to transient error messages, one per failed command
    #[must_use]
    pub fn subscribe_errors(&self) -> broadcast::Receiver<String> {
        self.inner.errors.subscribe()
    }

    /// Returns the transcript text
    #[must_use]
    pub fn transcript(&self) -> String {
        self.inner.state.borrow().transcript.text()
    }

    /// Returns true while a command is in flight
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.inner.state.borrow().busy
    }

    /// Submits a command
    ///
    /// Blank commands, and commands submitted while another is in flight,
    /// are ignored and `None` is returned. Otherwise the echo is appended
    /// immediately and the command runs on the tokio runtime; the returned
    /// handle completes once its result has been appended.
    pub fn submit(&self, command: &str) -> Option<JoinHandle<()>> {
        if self.inner.closed.load(Ordering::SeqCst) {
            return None;
        }
        let request = CommandRequest::new(command)?;

        let accepted = self.inner.state.send_if_modified(|s| {
            if s.busy {
                return false;
            }
            s.busy = true;
            s.transcript.push(format!("> {}\n", request.command));
            true
        });
        if !accepted {
            tracing::debug!(command = %request.command, "Console busy, dropping command");
            return None;
        }

        let inner = Arc::clone(&self.inner);
        let span = tracing::debug_span!(
            span_names::CONSOLE_SUBMIT,
            endpoint = %inner.endpoint.name
        );
        Some(tokio::spawn(async move { inner.run(request).await }.instrument(span)))
    }

    /// Clears the transcript
    pub fn clear(&self) {
        self.inner.state.send_modify(|s| s.transcript.clear());
    }

    /// Tears the session down; later results are discarded
    pub fn close(&self) {
        if !self.inner.closed.swap(true, Ordering::SeqCst) {
            tracing::debug!(endpoint = %self.inner.endpoint.name, "Console session closed");
        }
    }
}

impl Drop for ConsoleSession {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for ConsoleSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleSession")
            .field("endpoint", &self.inner.endpoint)
            .field("busy", &self.is_busy())
            .finish_non_exhaustive()
    }
}

impl Inner {
    async fn run(&self, request: CommandRequest) {
        let result = AssertUnwindSafe(self.transport.execute(&self.endpoint, &request.command))
            .catch_unwind()
            .await
            .unwrap_or_else(|_| {
                Err(TransportError::NetworkError(
                    "transport panicked while executing command".to_string(),
                ))
            });

        if self.closed.load(Ordering::SeqCst) {
            tracing::debug!(command = %request.command, "Session closed, discarding result");
            self.state.send_modify(|s| s.busy = false);
            return;
        }

        let failure = result.as_ref().err().map(ToString::to_string);
        let chunk = render_result(result);

        self.state.send_modify(|s| {
            s.transcript.push(chunk);
            s.transcript.push("\n");
            s.busy = false;
        });

        if let Some(message) = failure {
            tracing::debug!(command = %request.command, error = %message, "Command failed");
            // No subscribers is fine
            let _ = self.errors.send(message);
        }
    }
}

/// Formats a command result for the transcript
fn render_result(result: Result<CommandResponse, TransportError>) -> String {
    match result {
        Ok(CommandResponse {
            error: Some(error), ..
        }) => format!("ERROR: {error}\n"),
        Ok(CommandResponse { mut output, .. }) => {
            if !output.ends_with('\n') {
                output.push('\n');
            }
            output
        }
        Err(err) => format!("ERROR: {err}\n"),
    }
}
