//! Connection monitor for a single endpoint
//!
//! The monitor polls one endpoint at a fixed interval with the status
//! command, classifies every result as online or offline and republishes a
//! [`MonitorSnapshot`] through a `tokio::sync::watch` channel. The first
//! failure flips the endpoint offline and the first success flips it back;
//! there is no debounce.

mod connection;
mod snapshot;

pub use connection::ConnectionMonitor;
pub use snapshot::{LastUpdated, MonitorSnapshot, MonitorState};
