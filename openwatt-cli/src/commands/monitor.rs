//! Live status monitor command.

use std::path::Path;
use std::sync::Arc;

use openwatt_core::{ConnectionMonitor, MonitorSnapshot};

use crate::error::CliError;
use crate::format::{Palette, format_snapshot};
use crate::util::{build_transport, create_runtime, load_settings, open_store, resolve_target};

/// Parameters for the `monitor` command
pub struct MonitorParams<'a> {
    pub name: Option<&'a str>,
    pub interval: Option<u64>,
    pub cycles: Option<u32>,
}

/// `monitor` command handler
///
/// Prints a line whenever a refresh completes with a different outcome,
/// until Ctrl-C or the requested number of refreshes.
pub fn cmd_monitor(
    config_path: Option<&Path>,
    params: MonitorParams<'_>,
    palette: Palette,
) -> Result<(), CliError> {
    let store = Arc::new(open_store(config_path)?);
    let endpoint = resolve_target(&store, params.name)?;
    let mut settings = load_settings(config_path)?;
    if let Some(secs) = params.interval {
        settings.monitor.interval_secs = secs;
    }
    let transport = Arc::new(build_transport(&settings, None)?);
    let runtime = create_runtime()?;

    runtime.block_on(async {
        let mut monitor = ConnectionMonitor::new(store, transport, settings.monitor.clone());
        let mut rx = monitor.subscribe();

        println!(
            "Monitoring '{}' ({}) every {}s, Ctrl-C to stop",
            endpoint.name,
            endpoint.base_url(),
            monitor.interval().as_secs()
        );
        let mut seen = rx.borrow().refreshes;
        monitor.initialize(endpoint.id).await?;

        let mut completed = 0u64;
        let mut last_printed: Option<MonitorSnapshot> = None;

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => break,
                changed = rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let snapshot = rx.borrow_and_update().clone();
                    let fresh = take_new_refreshes(&mut seen, &snapshot);
                    if fresh == 0 {
                        continue;
                    }
                    completed += fresh;

                    if last_printed.as_ref().is_none_or(|last| differs(last, &snapshot)) {
                        println!("{}", format_snapshot(&snapshot, palette));
                        last_printed = Some(snapshot);
                    }
                    if params.cycles.is_some_and(|cycles| completed >= u64::from(cycles)) {
                        break;
                    }
                }
            }
        }

        monitor.shutdown().await;
        Ok::<(), CliError>(())
    })
}

/// Returns how many refreshes completed since `seen` and advances it
///
/// Several refreshes can land between two wakeups of the watch receiver.
fn take_new_refreshes(seen: &mut u64, snapshot: &MonitorSnapshot) -> u64 {
    let fresh = snapshot.refreshes.saturating_sub(*seen);
    *seen = snapshot.refreshes.max(*seen);
    fresh
}

/// True when the outcome changed enough to be worth another line
fn differs(last: &MonitorSnapshot, next: &MonitorSnapshot) -> bool {
    last.online != next.online
        || last.status.as_ref().map(|s| (&s.status, &s.uptime))
            != next.status.as_ref().map(|s| (&s.status, &s.uptime))
        || last.consecutive_failures != next.consecutive_failures
}
