//! System status derived from the `/system/sysinfo` command output

use serde::{Deserialize, Serialize};

/// Status reported when the output has no `Status:` line
pub const DEFAULT_STATUS: &str = "Running";

/// Uptime reported when the output has no `Uptime:` line
pub const DEFAULT_UPTIME: &str = "Unknown";

/// Status published while the endpoint is unreachable
pub const OFFLINE_STATUS: &str = "Offline";

/// Uptime published while the endpoint is unreachable
pub const OFFLINE_UPTIME: &str = "--";

/// Parsed view of a status query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemStatus {
    /// Status label, e.g. `Running`
    pub status: String,
    /// Uptime label as reported by the device
    pub uptime: String,
    /// True when the status is `Running` or `OK`
    pub healthy: bool,
    /// Unparsed command output, kept verbatim
    pub raw_output: String,
}

impl SystemStatus {
    /// Parses free-text status output.
    ///
    /// Lines are scanned in order and matched case-insensitively. A line
    /// containing `status:` sets the status to whatever follows its first
    /// colon; otherwise a line containing `uptime:` sets the uptime the same
    /// way. Later lines win. Unrecognized lines are ignored.
    #[must_use]
    pub fn parse(output: &str) -> Self {
        let mut status = DEFAULT_STATUS.to_string();
        let mut uptime = DEFAULT_UPTIME.to_string();

        for line in output.lines() {
            let lower = line.to_lowercase();
            if lower.contains("status:") {
                status = value_after_colon(line);
            } else if lower.contains("uptime:") {
                uptime = value_after_colon(line);
            }
        }

        let healthy = is_healthy_label(&status);
        Self {
            status,
            uptime,
            healthy,
            raw_output: output.to_string(),
        }
    }

    /// Synthetic status published after a failed refresh
    #[must_use]
    pub fn offline() -> Self {
        Self {
            status: OFFLINE_STATUS.to_string(),
            uptime: OFFLINE_UPTIME.to_string(),
            healthy: false,
            raw_output: String::new(),
        }
    }

    /// Returns true if this is the synthetic offline status
    #[must_use]
    pub fn is_offline(&self) -> bool {
        self.status == OFFLINE_STATUS && self.uptime == OFFLINE_UPTIME && !self.healthy
    }
}

impl Default for SystemStatus {
    fn default() -> Self {
        Self::parse("")
    }
}

fn value_after_colon(line: &str) -> String {
    line.split_once(':')
        .map(|(_, value)| value.trim().to_string())
        .unwrap_or_default()
}

fn is_healthy_label(status: &str) -> bool {
    status.eq_ignore_ascii_case("running") || status.eq_ignore_ascii_case("ok")
}
