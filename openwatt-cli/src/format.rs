//! Terminal output helpers.

use std::fmt::Write as _;

use openwatt_core::{Endpoint, MonitorSnapshot};
use uuid::Uuid;

use crate::error::CliError;

/// ANSI styles, blanked when color is disabled
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub green: &'static str,
    pub red: &'static str,
    pub yellow: &'static str,
    pub cyan: &'static str,
    pub bold: &'static str,
    pub reset: &'static str,
}

impl Palette {
    #[must_use]
    pub const fn new(color: bool) -> Self {
        if color {
            Self {
                green: "\x1b[32m",
                red: "\x1b[31m",
                yellow: "\x1b[33m",
                cyan: "\x1b[36m",
                bold: "\x1b[1m",
                reset: "\x1b[0m",
            }
        } else {
            Self {
                green: "",
                red: "",
                yellow: "",
                cyan: "",
                bold: "",
                reset: "",
            }
        }
    }
}

/// Format endpoints as a table string, marking the current one with `*`
#[must_use]
pub fn format_table(endpoints: &[Endpoint], current: Option<Uuid>) -> String {
    if endpoints.is_empty() {
        return "No endpoints registered.".to_string();
    }

    let mut output = String::new();

    let name_width = endpoints
        .iter()
        .map(|e| e.name.len())
        .max()
        .unwrap_or(4)
        .max(4);
    let host_width = endpoints
        .iter()
        .map(|e| e.host.len())
        .max()
        .unwrap_or(4)
        .max(4);
    let port_width = 5;
    let scheme_width = 6;

    let _ = writeln!(
        output,
        "  {:<name_width$}  {:<host_width$}  {:<port_width$}  {:<scheme_width$}",
        "NAME", "HOST", "PORT", "SCHEME"
    );
    let _ = writeln!(
        output,
        "  {:-<name_width$}  {:-<host_width$}  {:-<port_width$}  {:-<scheme_width$}",
        "", "", "", ""
    );

    for endpoint in endpoints {
        let marker = if current == Some(endpoint.id) { '*' } else { ' ' };
        let _ = writeln!(
            output,
            "{marker} {:<name_width$}  {:<host_width$}  {:<port_width$}  {:<scheme_width$}",
            endpoint.name,
            endpoint.host,
            endpoint.port,
            endpoint.scheme.as_str()
        );
    }

    output.trim_end().to_string()
}

/// Simplified endpoint output for JSON listings
#[derive(Debug, Clone, serde::Serialize)]
pub struct EndpointOutput {
    pub id: String,
    pub name: String,
    pub host: String,
    pub port: u16,
    pub scheme: String,
    pub url: String,
    pub current: bool,
}

impl EndpointOutput {
    fn new(endpoint: &Endpoint, current: Option<Uuid>) -> Self {
        Self {
            id: endpoint.id.to_string(),
            name: endpoint.name.clone(),
            host: endpoint.host.clone(),
            port: endpoint.port,
            scheme: endpoint.scheme.to_string(),
            url: endpoint.base_url(),
            current: current == Some(endpoint.id),
        }
    }
}

/// Format endpoints as a JSON array
///
/// # Errors
///
/// Returns `CliError::Config` if JSON serialization fails.
pub fn format_json(endpoints: &[Endpoint], current: Option<Uuid>) -> Result<String, CliError> {
    let output: Vec<_> = endpoints
        .iter()
        .map(|e| EndpointOutput::new(e, current))
        .collect();
    serde_json::to_string_pretty(&output)
        .map_err(|e| CliError::Config(format!("Failed to serialize to JSON: {e}")))
}

/// One status line for the monitor
#[must_use]
pub fn format_snapshot(snapshot: &MonitorSnapshot, palette: Palette) -> String {
    let Palette {
        green,
        red,
        yellow,
        bold,
        reset,
        ..
    } = palette;

    let name = snapshot.endpoint_name().unwrap_or("?");
    let mut line = if snapshot.online {
        format!("{green}{bold}●{reset} {name} {green}online{reset}")
    } else {
        format!("{red}{bold}●{reset} {name} {red}offline{reset}")
    };

    if let Some(status) = &snapshot.status {
        let _ = write!(line, "  Status: {}  Uptime: {}", status.status, status.uptime);
    }
    if snapshot.consecutive_failures > 0 {
        let _ = write!(
            line,
            "  {yellow}failures: {}{reset}",
            snapshot.consecutive_failures
        );
    }
    let _ = write!(line, "  ({})", snapshot.last_updated);
    line
}
