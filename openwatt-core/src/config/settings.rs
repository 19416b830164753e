//! Application settings (stored in `config.toml`)

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::tracing::TracingLevel;
use crate::transport::{DEFAULT_TIMEOUT_SECS, TransportConfig};

/// Default polling interval in seconds
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

const MAX_TIMEOUT_SECS: u64 = 300;
const MAX_POLL_INTERVAL_SECS: u64 = 3600;

/// Root of `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    /// HTTP timeouts
    #[serde(default)]
    pub transport: TransportSettings,
    /// Connection monitor settings
    #[serde(default)]
    pub monitor: MonitorSettings,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Request timeouts (`[transport]`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportSettings {
    /// Connect timeout in seconds (1–300, default: 2)
    #[serde(default = "default_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Read timeout in seconds (1–300, default: 2)
    #[serde(default = "default_timeout_secs")]
    pub read_timeout_secs: u64,
    /// Write timeout in seconds (1–300, default: 2)
    #[serde(default = "default_timeout_secs")]
    pub write_timeout_secs: u64,
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: DEFAULT_TIMEOUT_SECS,
            read_timeout_secs: DEFAULT_TIMEOUT_SECS,
            write_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl TransportSettings {
    /// Converts to the transport's timeout config, clamping each value
    #[must_use]
    pub fn to_transport_config(&self) -> TransportConfig {
        let clamp = |secs: u64| Duration::from_secs(secs.clamp(1, MAX_TIMEOUT_SECS));
        TransportConfig {
            connect_timeout: clamp(self.connect_timeout_secs),
            read_timeout: clamp(self.read_timeout_secs),
            write_timeout: clamp(self.write_timeout_secs),
        }
    }
}

/// Connection monitor settings (`[monitor]`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorSettings {
    /// Polling interval in seconds (1–3600, default: 10)
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

const fn default_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_POLL_INTERVAL_SECS,
        }
    }
}

impl MonitorSettings {
    /// Creates settings with the given interval
    #[must_use]
    pub const fn with_interval_secs(secs: u64) -> Self {
        Self {
            interval_secs: secs,
        }
    }

    /// Returns the interval clamped to the valid range
    #[must_use]
    pub const fn effective_interval_secs(&self) -> u64 {
        if self.interval_secs == 0 {
            1
        } else if self.interval_secs > MAX_POLL_INTERVAL_SECS {
            MAX_POLL_INTERVAL_SECS
        } else {
            self.interval_secs
        }
    }

    /// Returns the effective interval as a `Duration`
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.effective_interval_secs())
    }
}

/// Logging settings (`[logging]`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default log level when no `-v` flag is given
    #[serde(default = "default_level")]
    pub level: String,
    /// Append logs to this file instead of stderr
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Raw `EnvFilter` directive, e.g. `openwatt_core=debug,reqwest=info`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

fn default_level() -> String {
    TracingLevel::Warn.to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: None,
            filter: None,
        }
    }
}

impl LoggingSettings {
    /// Parses the configured level, falling back to `warn`
    #[must_use]
    pub fn tracing_level(&self) -> TracingLevel {
        self.level.parse().unwrap_or(TracingLevel::Warn)
    }
}
