//! `OpenWatt` Core Library
//!
//! This crate provides the core functionality for the `OpenWatt` client:
//! executing CLI commands on remote devices over HTTP and keeping track of
//! whether those devices are reachable.
//!
//! # Crate Structure
//!
//! - [`models`] - Core data structures (Endpoint, command request/response, system status)
//! - [`transport`] - HTTP transport for command execution and health probes
//! - [`registry`] - Endpoint registry trait, in-memory and file-backed stores
//! - [`monitor`] - Polling connection monitor and its published snapshot
//! - [`console`] - Interactive command session with a transcript
//! - [`registration`] - Validation and connection testing for new endpoints
//! - [`config`] - Application settings and persistence
//! - [`tracing`] - Structured logging setup

#![warn(missing_docs)]

pub mod config;
pub mod console;
pub mod error;
pub mod models;
pub mod monitor;
pub mod registration;
pub mod registry;
pub mod tracing;
pub mod transport;

pub use config::{
    AppSettings, ConfigManager, LoggingSettings, MonitorSettings, TransportSettings,
};
pub use console::{ConsoleSession, ConsoleState, Transcript};
pub use error::{ConfigError, ConfigResult, OpenWattError, SessionError, SessionResult};
pub use models::{CommandRequest, CommandResponse, Endpoint, Scheme, SystemStatus};
pub use monitor::{ConnectionMonitor, LastUpdated, MonitorSnapshot, MonitorState};
pub use registration::{EndpointDraft, register, test_connection};
pub use registry::{EndpointRegistry, EndpointStore, InMemoryRegistry};
pub use transport::{
    CommandTransport, HttpTransport, SYSINFO_COMMAND, TransportError, TransportResult,
};
