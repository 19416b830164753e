//! Structured logging setup
//!
//! Builds the `tracing_subscriber` stack from the `[logging]` section and the
//! CLI verbosity flags, and names the spans used across the crate.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LoggingSettings;

static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Targets that receive the configured level
const CRATE_TARGETS: [&str; 2] = ["openwatt_core", "openwatt"];

/// Errors raised while installing the subscriber
#[derive(Debug, Error)]
pub enum TracingError {
    /// A subscriber is already installed
    #[error("Tracing has already been initialized")]
    AlreadyInitialized,

    /// The filter directive does not parse
    #[error("Invalid log filter '{directive}': {reason}")]
    InvalidFilter {
        /// Directive as configured
        directive: String,
        /// Parser message
        reason: String,
    },

    /// The log file cannot be opened
    #[error("Cannot open log file {path}: {source}")]
    LogFile {
        /// Requested path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The global subscriber could not be set
    #[error("Failed to initialize tracing: {0}")]
    InitializationFailed(String),
}

/// Result type for tracing operations
pub type TracingResult<T> = Result<T, TracingError>;

/// Log verbosity, ordered from quietest to loudest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum TracingLevel {
    /// Errors only
    Error,
    /// Errors and warnings
    #[default]
    Warn,
    /// Adds state transitions
    Info,
    /// Adds per-request detail
    Debug,
    /// Everything
    Trace,
}

impl TracingLevel {
    /// Directive keyword for `EnvFilter`
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }

    /// Raises `base` according to a `-v` count
    ///
    /// Flags only ever make logging louder: `-v` on top of a configured
    /// `debug` stays at `debug`.
    #[must_use]
    pub fn from_verbosity(verbose: u8, base: Self) -> Self {
        let requested = match verbose {
            0 => return base,
            1 => Self::Info,
            2 => Self::Debug,
            _ => Self::Trace,
        };
        base.max(requested)
    }
}

impl std::str::FromStr for TracingLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for TracingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the subscriber is built
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TracingConfig {
    /// Level applied to the crate targets
    pub level: TracingLevel,
    /// Append to this file instead of writing to stderr
    pub file: Option<PathBuf>,
    /// Raw `EnvFilter` directive, replaces the level-based one
    pub filter: Option<String>,
}

impl TracingConfig {
    /// Builds the config for a CLI run
    ///
    /// `log_file` from the command line wins over `[logging] file`.
    #[must_use]
    pub fn from_settings(
        settings: &LoggingSettings,
        verbose: u8,
        log_file: Option<PathBuf>,
    ) -> Self {
        Self {
            level: TracingLevel::from_verbosity(verbose, settings.tracing_level()),
            file: log_file.or_else(|| settings.file.clone()),
            filter: settings
                .filter
                .as_deref()
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(ToString::to_string),
        }
    }

    /// Returns the `EnvFilter` directive this config produces
    #[must_use]
    pub fn directive(&self) -> String {
        if let Some(filter) = &self.filter {
            return filter.clone();
        }
        CRATE_TARGETS
            .iter()
            .map(|target| format!("{target}={}", self.level))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Installs the global subscriber
///
/// # Errors
///
/// Fails if a subscriber was already installed by this function, the
/// filter is invalid, or the log file cannot be opened.
pub fn init_tracing(config: &TracingConfig) -> TracingResult<()> {
    let directive = config.directive();
    let filter = EnvFilter::try_new(&directive).map_err(|e| TracingError::InvalidFilter {
        directive: directive.clone(),
        reason: e.to_string(),
    })?;

    let writer = match &config.file {
        Some(path) => Some(open_log_file(path)?),
        None => None,
    };

    if INSTALLED.swap(true, Ordering::SeqCst) {
        return Err(TracingError::AlreadyInitialized);
    }

    let layer = tracing_subscriber::fmt::layer().with_target(true);
    let registry = tracing_subscriber::registry().with(filter);
    let installed = match writer {
        Some(file) => registry
            .with(layer.with_ansi(false).with_writer(file))
            .try_init(),
        None => registry.with(layer.with_writer(std::io::stderr)).try_init(),
    };
    installed.map_err(|e| TracingError::InitializationFailed(e.to_string()))?;

    tracing::debug!(%directive, file = ?config.file, "Tracing initialized");
    Ok(())
}

fn open_log_file(path: &Path) -> TracingResult<File> {
    File::options()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| TracingError::LogFile {
            path: path.to_path_buf(),
            source,
        })
}

/// Standard span names for `OpenWatt` operations
pub mod span_names {
    /// One monitor refresh cycle
    pub const MONITOR_REFRESH: &str = "monitor.refresh";
    /// Console command submission
    pub const CONSOLE_SUBMIT: &str = "console.submit";
    /// Endpoint registration
    pub const ENDPOINT_REGISTER: &str = "endpoint.register";
}
