//! State published by the connection monitor

use std::fmt;

use chrono::{DateTime, Local, Utc};

use crate::models::{Endpoint, SystemStatus};

/// Lifecycle of a monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonitorState {
    /// Not yet initialized
    #[default]
    Idle,
    /// Poll loop running
    Polling,
    /// Poll loop stopped
    Stopped,
    /// The requested endpoint was not in the registry
    NotFound,
}

impl MonitorState {
    /// Returns a short label for display
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Polling => "polling",
            Self::Stopped => "stopped",
            Self::NotFound => "not found",
        }
    }
}

impl fmt::Display for MonitorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When the status was last refreshed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LastUpdated {
    /// No refresh has completed yet
    #[default]
    Never,
    /// Last refresh succeeded at this time
    At(DateTime<Utc>),
    /// Last refresh failed
    ConnectionLost,
}

impl LastUpdated {
    /// Returns the time of the last successful refresh, if the last one succeeded
    #[must_use]
    pub const fn time(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::At(time) => Some(*time),
            _ => None,
        }
    }
}

impl fmt::Display for LastUpdated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Never => f.write_str("Last updated: never"),
            Self::At(time) => write!(
                f,
                "Last updated: {}",
                time.with_timezone(&Local).format("%H:%M:%S")
            ),
            Self::ConnectionLost => f.write_str("Last updated: Connection lost"),
        }
    }
}

/// Everything the monitor publishes, replaced wholesale on every change
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MonitorSnapshot {
    /// Lifecycle state
    pub state: MonitorState,
    /// Monitored endpoint (snapshot taken at initialization)
    pub endpoint: Option<Endpoint>,
    /// Result of the latest refresh
    pub online: bool,
    /// Parsed status, or the synthetic offline status after a failure
    pub status: Option<SystemStatus>,
    /// Last refresh outcome
    pub last_updated: LastUpdated,
    /// Failed refreshes since the last success; informational only
    pub consecutive_failures: u32,
    /// True while a refresh is in flight
    pub refreshing: bool,
    /// Completed refreshes over the monitor's lifetime, successful or not
    ///
    /// Only ever grows, so watchers that miss intermediate snapshots can
    /// still tell how many refreshes happened.
    pub refreshes: u64,
    /// All registered endpoints, for pickers
    pub endpoints: Vec<Endpoint>,
}

impl MonitorSnapshot {
    /// Display name of the monitored endpoint
    #[must_use]
    pub fn endpoint_name(&self) -> Option<&str> {
        self.endpoint.as_ref().map(|e| e.name.as_str())
    }

    /// Returns true while the poll loop is running
    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.state == MonitorState::Polling
    }

    /// Clears everything learned about the previous endpoint
    pub(crate) fn reset_session(&mut self) {
        self.online = false;
        self.status = None;
        self.last_updated = LastUpdated::Never;
        self.consecutive_failures = 0;
    }

    pub(crate) fn record_success(&mut self, status: SystemStatus, at: DateTime<Utc>) {
        self.refreshes = self.refreshes.saturating_add(1);
        self.online = true;
        self.status = Some(status);
        self.last_updated = LastUpdated::At(at);
        self.consecutive_failures = 0;
    }

    pub(crate) fn record_failure(&mut self) {
        self.refreshes = self.refreshes.saturating_add(1);
        self.online = false;
        self.status = Some(SystemStatus::offline());
        self.last_updated = LastUpdated::ConnectionLost;
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
    }
}
