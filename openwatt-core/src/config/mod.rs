//! Configuration management for `OpenWatt`
//!
//! This module provides the `ConfigManager` for loading and saving
//! configuration files in TOML format.

mod manager;
pub mod settings;

pub use manager::{CONFIG_FILE, ConfigManager, ENDPOINTS_FILE, EndpointFile};
pub use settings::{AppSettings, LoggingSettings, MonitorSettings, TransportSettings};
