//! Core data models for `OpenWatt`
//!
//! Plain data shared by the transport, monitor and console: what an
//! endpoint is, what goes over the wire, and the status derived from a
//! status query.

mod command;
mod endpoint;
mod status;

pub use command::{CommandRequest, CommandResponse};
pub use endpoint::{DEFAULT_PORT, Endpoint, Scheme};
pub use status::{
    DEFAULT_STATUS, DEFAULT_UPTIME, OFFLINE_STATUS, OFFLINE_UPTIME, SystemStatus,
};
