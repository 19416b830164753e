//! Poll loop and lifecycle of [`ConnectionMonitor`]

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::FutureExt;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::Instrument;
use uuid::Uuid;

use super::snapshot::{MonitorSnapshot, MonitorState};
use crate::config::MonitorSettings;
use crate::error::{SessionError, SessionResult};
use crate::models::{Endpoint, SystemStatus};
use crate::registry::EndpointRegistry;
use crate::tracing::span_names;
use crate::transport::{CommandTransport, SYSINFO_COMMAND, TransportError};

/// State shared between the monitor handle and its poll task
struct Shared {
    transport: Arc<dyn CommandTransport>,
    snapshot: watch::Sender<MonitorSnapshot>,
    /// Serializes refreshes so a manual refresh never overlaps the loop
    refresh_lock: Mutex<()>,
}

/// A running poll loop
struct Poller {
    endpoint_id: Uuid,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

/// Polls one endpoint and publishes its liveness
///
/// The monitor is owned by a single consumer and driven through `&mut self`
/// methods. Observers call [`ConnectionMonitor::subscribe`] and read the
/// latest [`MonitorSnapshot`]. Dropping the monitor stops its poll loop.
pub struct ConnectionMonitor {
    shared: Arc<Shared>,
    registry: Arc<dyn EndpointRegistry>,
    settings: MonitorSettings,
    poller: Option<Poller>,
}

impl ConnectionMonitor {
    /// Creates an idle monitor
    #[must_use]
    pub fn new(
        registry: Arc<dyn EndpointRegistry>,
        transport: Arc<dyn CommandTransport>,
        settings: MonitorSettings,
    ) -> Self {
        let (snapshot, _) = watch::channel(MonitorSnapshot::default());
        Self {
            shared: Arc::new(Shared {
                transport,
                snapshot,
                refresh_lock: Mutex::new(()),
            }),
            registry,
            settings,
            poller: None,
        }
    }

    /// Subscribes to snapshot changes
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<MonitorSnapshot> {
        self.shared.snapshot.subscribe()
    }

    /// Returns a copy of the latest snapshot
    #[must_use]
    pub fn snapshot(&self) -> MonitorSnapshot {
        self.shared.snapshot.borrow().clone()
    }

    /// Failed refreshes since the last success
    #[must_use]
    pub fn consecutive_failures(&self) -> u32 {
        self.shared.snapshot.borrow().consecutive_failures
    }

    /// Returns the polling interval in use
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.settings.interval()
    }

    /// Returns true while a poll loop is running
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.poller
            .as_ref()
            .is_some_and(|p| !*p.shutdown.borrow() && !p.task.is_finished())
    }

    /// Starts monitoring an endpoint
    ///
    /// Publishes the endpoint with a fresh status and failure counter, then
    /// starts the poll loop; the first refresh runs immediately. If a loop is already running this is a no-op:
    /// use [`ConnectionMonitor::switch_to`] to change the target.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EndpointNotFound` if the endpoint is not
    /// registered. No polling starts in that case, and the registry's
    /// current marker is cleared if it pointed at the missing endpoint.
    pub async fn initialize(&mut self, id: Uuid) -> SessionResult<()> {
        if self.is_running() {
            tracing::debug!(%id, "Monitor already polling, ignoring initialize");
            return Ok(());
        }
        self.join_poller().await;

        let endpoints = self.registry.list_all();
        let Some(endpoint) = self.registry.resolve(id) else {
            tracing::warn!(%id, "Cannot monitor endpoint: not registered");
            if self.registry.current_id() == Some(id)
                && let Err(e) = self.registry.clear_current()
            {
                tracing::warn!(%e, "Failed to clear current endpoint");
            }
            self.shared.snapshot.send_modify(|s| {
                s.reset_session();
                s.state = MonitorState::NotFound;
                s.endpoint = None;
                s.endpoints = endpoints;
            });
            return Err(SessionError::EndpointNotFound(id));
        };

        tracing::info!(
            endpoint = %endpoint.name,
            url = %endpoint.base_url(),
            interval_secs = self.settings.effective_interval_secs(),
            "Starting connection monitor"
        );

        self.shared.snapshot.send_modify(|s| {
            s.reset_session();
            s.state = MonitorState::Polling;
            s.endpoint = Some(endpoint.clone());
            s.endpoints = endpoints;
        });
        self.start_polling(endpoint);
        Ok(())
    }

    /// Stops the current loop and starts monitoring another endpoint
    ///
    /// Waits for the old loop to finish (including an in-flight refresh),
    /// so nothing targeting the old endpoint is published afterwards.
    ///
    /// # Errors
    ///
    /// Same as [`ConnectionMonitor::initialize`].
    pub async fn switch_to(&mut self, id: Uuid) -> SessionResult<()> {
        if let Some(poller) = &self.poller {
            tracing::info!(from = %poller.endpoint_id, to = %id, "Switching monitored endpoint");
        }
        self.stop();
        self.join_poller().await;
        self.initialize(id).await
    }

    /// Stops the poll loop
    ///
    /// The pending wait is cancelled right away; a refresh already in
    /// flight completes and publishes, then the loop exits. Idempotent.
    pub fn stop(&self) {
        if let Some(poller) = &self.poller
            && !poller.shutdown.send_replace(true)
        {
            tracing::debug!(endpoint = %poller.endpoint_id, "Stopping connection monitor");
        }
        self.shared.snapshot.send_if_modified(|s| {
            if s.state == MonitorState::Polling {
                s.state = MonitorState::Stopped;
                true
            } else {
                false
            }
        });
    }

    /// Stops the poll loop and waits for it to exit
    pub async fn shutdown(&mut self) {
        self.stop();
        self.join_poller().await;
    }

    /// Refreshes the status once, outside the regular cadence
    ///
    /// Does nothing if no endpoint has been initialized. Waits for an
    /// in-flight loop refresh to finish first.
    pub async fn refresh(&self) {
        let endpoint = self.shared.snapshot.borrow().endpoint.clone();
        if let Some(endpoint) = endpoint {
            self.shared.refresh(&endpoint).await;
        }
    }

    fn start_polling(&mut self, endpoint: Endpoint) {
        let (shutdown, shutdown_rx) = watch::channel(false);
        let endpoint_id = endpoint.id;
        let task = tokio::spawn(poll_loop(
            Arc::clone(&self.shared),
            endpoint,
            self.settings.interval(),
            shutdown_rx,
        ));
        self.poller = Some(Poller {
            endpoint_id,
            shutdown,
            task,
        });
    }

    async fn join_poller(&mut self) {
        let Some(poller) = self.poller.take() else {
            return;
        };
        poller.shutdown.send_replace(true);
        if let Err(e) = poller.task.await
            && e.is_panic()
        {
            tracing::error!(endpoint = %poller.endpoint_id, "Poll loop panicked");
        }
    }
}

impl Drop for ConnectionMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for ConnectionMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionMonitor")
            .field("snapshot", &*self.shared.snapshot.borrow())
            .field("settings", &self.settings)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl Shared {
    async fn refresh(&self, endpoint: &Endpoint) {
        let _guard = self.refresh_lock.lock().await;
        let span = tracing::debug_span!(span_names::MONITOR_REFRESH, endpoint = %endpoint.name);

        async {
            self.snapshot.send_modify(|s| s.refreshing = true);
            let was_online = self.snapshot.borrow().online;

            let result = AssertUnwindSafe(self.transport.execute(endpoint, SYSINFO_COMMAND))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| {
                    Err(TransportError::NetworkError(
                        "transport panicked during status query".to_string(),
                    ))
                });

            match result {
                Ok(response) => {
                    let status = SystemStatus::parse(&response.output);
                    if !was_online {
                        tracing::info!(status = %status.status, uptime = %status.uptime, "Endpoint online");
                    }
                    self.snapshot.send_modify(|s| {
                        s.record_success(status, Utc::now());
                        s.refreshing = false;
                    });
                }
                Err(err) => {
                    self.snapshot.send_modify(|s| {
                        s.record_failure();
                        s.refreshing = false;
                    });
                    let failures = self.snapshot.borrow().consecutive_failures;
                    if was_online {
                        tracing::warn!(%err, "Endpoint went offline");
                    } else {
                        tracing::debug!(%err, failures, "Status refresh failed");
                    }
                }
            }
        }
        .instrument(span)
        .await;
    }
}

async fn poll_loop(
    shared: Arc<Shared>,
    endpoint: Endpoint,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    tracing::debug!(endpoint = %endpoint.name, "Poll loop started");

    loop {
        if *shutdown.borrow_and_update() {
            break;
        }

        shared.refresh(&endpoint).await;

        // An error means the monitor was dropped
        tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            () = tokio::time::sleep(interval) => {}
        }
    }

    shared.snapshot.send_if_modified(|s| {
        let ours = s.endpoint.as_ref().is_some_and(|e| e.id == endpoint.id);
        if ours && s.state == MonitorState::Polling {
            s.state = MonitorState::Stopped;
            true
        } else {
            false
        }
    });
    tracing::debug!(endpoint = %endpoint.name, "Poll loop stopped");
}
