//! Registered remote endpoints

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Port used when none is given
pub const DEFAULT_PORT: u16 = 80;

/// Transport scheme of an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    /// Plain HTTP
    #[default]
    Http,
    /// HTTP over TLS
    Https,
}

impl Scheme {
    /// Returns the URL scheme string
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }

    /// Maps the legacy `use https` flag onto a scheme
    #[must_use]
    pub const fn from_https(https: bool) -> Self {
        if https { Self::Https } else { Self::Http }
    }

    /// Returns true for the encrypted scheme
    #[must_use]
    pub const fn is_https(self) -> bool {
        matches!(self, Self::Https)
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            other => Err(format!("unknown scheme '{other}'")),
        }
    }
}

/// A registered remote device the client can talk to
///
/// Consumers hold endpoints by value: the monitor and console keep a
/// snapshot taken at initialization, so editing the registry later does not
/// affect them until they are re-initialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Stable identifier, never changes once assigned
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Hostname or IP address
    pub host: String,
    /// TCP port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Transport scheme
    #[serde(default)]
    pub scheme: Scheme,
}

const fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Endpoint {
    /// Creates an endpoint with a fresh identifier
    #[must_use]
    pub fn new(name: impl Into<String>, host: impl Into<String>, port: u16, scheme: Scheme) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            host: host.into(),
            port,
            scheme,
        }
    }

    /// Creates an unregistered endpoint used only for a connection test
    #[must_use]
    pub fn transient(host: impl Into<String>, port: u16, scheme: Scheme) -> Self {
        Self {
            id: Uuid::nil(),
            name: "Test".to_string(),
            host: host.into(),
            port,
            scheme,
        }
    }

    /// Returns `scheme://host:port`
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }

    /// Joins an absolute API path onto the base URL
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url())
    }
}
