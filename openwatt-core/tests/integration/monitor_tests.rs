//! Connection monitor lifecycle and polling behaviour

use std::sync::Arc;
use std::time::Duration;

use openwatt_core::{
    ConnectionMonitor, EndpointRegistry, InMemoryRegistry, LastUpdated, MonitorSettings,
    MonitorState, SYSINFO_COMMAND, SessionError, TransportError,
};
use uuid::Uuid;

use super::support::{
    PanickingTransport, ScriptedTransport, UncheckedRegistry, endpoint, network_error, ok,
};

const INTERVAL_SECS: u64 = 10;

fn monitor(
    registry: Arc<dyn EndpointRegistry>,
    transport: Arc<ScriptedTransport>,
) -> ConnectionMonitor {
    ConnectionMonitor::new(
        registry,
        transport,
        MonitorSettings::with_interval_secs(INTERVAL_SECS),
    )
}

#[tokio::test(start_paused = true)]
async fn first_refresh_runs_immediately_and_goes_online() {
    let inverter = endpoint("inverter");
    let registry = Arc::new(InMemoryRegistry::with_endpoints([inverter.clone()]));
    let transport = Arc::new(ScriptedTransport::online("Status: Running\nUptime: 3 days"));
    let mut monitor = monitor(registry, Arc::clone(&transport));

    let mut rx = monitor.subscribe();
    monitor.initialize(inverter.id).await.expect("registered");
    assert!(monitor.is_running());

    let snapshot = rx.wait_for(|s| s.online).await.expect("monitor alive").clone();
    assert_eq!(snapshot.state, MonitorState::Polling);
    assert_eq!(snapshot.endpoint_name(), Some("inverter"));
    assert_eq!(snapshot.endpoints, vec![inverter.clone()]);
    let status = snapshot.status.expect("status published");
    assert_eq!(status.status, "Running");
    assert_eq!(status.uptime, "3 days");
    assert!(status.healthy);
    assert!(matches!(snapshot.last_updated, LastUpdated::At(_)));

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].endpoint_id, inverter.id);
    assert_eq!(calls[0].command, SYSINFO_COMMAND);
}

#[tokio::test(start_paused = true)]
async fn single_failure_flips_offline_and_success_flips_back() {
    let inverter = endpoint("inverter");
    let registry = Arc::new(InMemoryRegistry::with_endpoints([inverter.clone()]));
    let transport = Arc::new(
        ScriptedTransport::online("Status: OK")
            .then(ok("Status: OK"))
            .then(Err(network_error())),
    );
    let mut monitor = monitor(registry, Arc::clone(&transport));
    let mut rx = monitor.subscribe();

    monitor.initialize(inverter.id).await.expect("registered");
    rx.wait_for(|s| s.online).await.expect("monitor alive");

    let offline = rx.wait_for(|s| !s.online).await.expect("monitor alive").clone();
    assert_eq!(offline.consecutive_failures, 1);
    assert_eq!(offline.last_updated, LastUpdated::ConnectionLost);
    assert_eq!(
        offline.last_updated.to_string(),
        "Last updated: Connection lost"
    );
    let status = offline.status.expect("offline status");
    assert!(status.is_offline());
    assert_eq!(status.uptime, "--");

    let back = rx.wait_for(|s| s.online).await.expect("monitor alive").clone();
    assert_eq!(back.consecutive_failures, 0);
    assert_eq!(transport.call_count(), 4);
}

#[tokio::test(start_paused = true)]
async fn failure_counter_grows_until_success() {
    let inverter = endpoint("inverter");
    let registry = Arc::new(InMemoryRegistry::with_endpoints([inverter.clone()]));
    let transport = Arc::new(
        ScriptedTransport::online("Status: Running")
            .then(Err(network_error()))
            .then(Err(TransportError::http_status(503)))
            .then(Err(TransportError::EmptyBody)),
    );
    let mut monitor = monitor(registry, Arc::clone(&transport));
    let mut rx = monitor.subscribe();

    monitor.initialize(inverter.id).await.expect("registered");
    rx.wait_for(|s| s.consecutive_failures == 3)
        .await
        .expect("monitor alive");
    assert_eq!(monitor.consecutive_failures(), 3);
    assert!(!monitor.snapshot().online);

    rx.wait_for(|s| s.online).await.expect("monitor alive");
    assert_eq!(monitor.consecutive_failures(), 0);
}

#[tokio::test(start_paused = true)]
async fn polls_at_configured_interval() {
    let inverter = endpoint("inverter");
    let registry = Arc::new(InMemoryRegistry::with_endpoints([inverter.clone()]));
    let transport = Arc::new(ScriptedTransport::online("Status: Running"));
    let mut monitor = monitor(registry, Arc::clone(&transport));
    let mut rx = monitor.subscribe();

    monitor.initialize(inverter.id).await.expect("registered");
    rx.wait_for(|s| s.online).await.expect("monitor alive");
    assert_eq!(transport.call_count(), 1);

    tokio::time::sleep(Duration::from_secs(INTERVAL_SECS - 1)).await;
    assert_eq!(transport.call_count(), 1);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(transport.call_count(), 2);

    tokio::time::sleep(Duration::from_secs(INTERVAL_SECS)).await;
    assert_eq!(transport.call_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn stop_is_idempotent_and_cancels_pending_wait() {
    let inverter = endpoint("inverter");
    let registry = Arc::new(InMemoryRegistry::with_endpoints([inverter.clone()]));
    let transport = Arc::new(ScriptedTransport::online("Status: Running"));
    let mut monitor = monitor(registry, Arc::clone(&transport));
    let mut rx = monitor.subscribe();

    monitor.initialize(inverter.id).await.expect("registered");
    rx.wait_for(|s| s.online).await.expect("monitor alive");

    monitor.stop();
    monitor.stop();
    assert_eq!(monitor.snapshot().state, MonitorState::Stopped);
    assert!(!monitor.is_running());

    // Returns without waiting out the interval
    let started = tokio::time::Instant::now();
    monitor.shutdown().await;
    assert!(started.elapsed() < Duration::from_secs(INTERVAL_SECS));

    tokio::time::sleep(Duration::from_secs(INTERVAL_SECS * 6)).await;
    assert_eq!(transport.call_count(), 1);
    assert_eq!(monitor.snapshot().state, MonitorState::Stopped);
}

#[tokio::test(start_paused = true)]
async fn initialize_while_running_is_noop() {
    let a = endpoint("a");
    let b = endpoint("b");
    let registry = Arc::new(InMemoryRegistry::with_endpoints([a.clone(), b.clone()]));
    let transport = Arc::new(ScriptedTransport::online("Status: Running"));
    let mut monitor = monitor(registry, Arc::clone(&transport));
    let mut rx = monitor.subscribe();

    monitor.initialize(a.id).await.expect("registered");
    rx.wait_for(|s| s.online).await.expect("monitor alive");

    monitor.initialize(b.id).await.expect("ignored");
    assert_eq!(monitor.snapshot().endpoint_name(), Some("a"));

    tokio::time::sleep(Duration::from_secs(INTERVAL_SECS * 3)).await;
    assert!(transport.calls().iter().all(|c| c.endpoint_id == a.id));
}

#[tokio::test(start_paused = true)]
async fn switch_to_targets_new_endpoint_and_resets_counter() {
    let a = endpoint("a");
    let b = endpoint("b");
    let registry = Arc::new(InMemoryRegistry::with_endpoints([a.clone(), b.clone()]));
    let transport = Arc::new(ScriptedTransport::offline());
    let mut monitor = monitor(registry, Arc::clone(&transport));
    let mut rx = monitor.subscribe();

    monitor.initialize(a.id).await.expect("registered");
    rx.wait_for(|s| s.consecutive_failures == 2)
        .await
        .expect("monitor alive");

    monitor.switch_to(b.id).await.expect("registered");
    let calls_before_switch = transport.call_count();

    let snapshot = monitor.snapshot();
    assert_eq!(snapshot.endpoint_name(), Some("b"));
    assert_eq!(snapshot.consecutive_failures, 0);
    assert_eq!(snapshot.last_updated, LastUpdated::Never);
    assert_eq!(snapshot.status, None);
    assert_eq!(snapshot.state, MonitorState::Polling);

    tokio::time::sleep(Duration::from_secs(INTERVAL_SECS * 4)).await;

    let calls = transport.calls();
    assert!(calls.len() > calls_before_switch);
    assert!(calls[calls_before_switch..]
        .iter()
        .all(|c| c.endpoint_id == b.id));
    assert_eq!(monitor.snapshot().endpoint_name(), Some("b"));
}

#[tokio::test(start_paused = true)]
async fn switch_to_waits_for_in_flight_refresh() {
    let a = endpoint("a");
    let b = endpoint("b");
    let registry = Arc::new(InMemoryRegistry::with_endpoints([a.clone(), b.clone()]));
    let transport = Arc::new(ScriptedTransport::online("Status: Running").gated());
    let mut monitor = monitor(registry, Arc::clone(&transport));

    monitor.initialize(a.id).await.expect("registered");
    tokio::task::yield_now().await;
    assert_eq!(transport.call_count(), 1);

    // The refresh for `a` is parked; release it once the switch is waiting
    let releaser = {
        let transport = Arc::clone(&transport);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            transport.release();
        })
    };
    monitor.switch_to(b.id).await.expect("registered");
    releaser.await.expect("releaser");

    let snapshot = monitor.snapshot();
    assert_eq!(snapshot.endpoint_name(), Some("b"));
    assert!(!snapshot.online);
    assert_eq!(snapshot.status, None);
}

#[tokio::test(start_paused = true)]
async fn unknown_endpoint_reports_not_found_without_polling() {
    let transport = Arc::new(ScriptedTransport::online("Status: Running"));
    let known = endpoint("known");
    let missing = Uuid::new_v4();
    let registry = Arc::new(UncheckedRegistry::new(vec![known.clone()], Some(missing)));
    let mut monitor = monitor(
        Arc::clone(&registry) as Arc<dyn EndpointRegistry>,
        Arc::clone(&transport),
    );

    let err = monitor.initialize(missing).await.expect_err("not registered");
    assert_eq!(err, SessionError::EndpointNotFound(missing));

    let snapshot = monitor.snapshot();
    assert_eq!(snapshot.state, MonitorState::NotFound);
    assert_eq!(snapshot.endpoint, None);
    assert_eq!(snapshot.endpoints, vec![known]);
    assert!(!monitor.is_running());
    assert_eq!(registry.current_id(), None);

    tokio::time::sleep(Duration::from_secs(INTERVAL_SECS * 3)).await;
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn not_found_leaves_other_current_marker() {
    let known = endpoint("known");
    let registry = Arc::new(UncheckedRegistry::new(vec![known.clone()], Some(known.id)));
    let mut monitor = monitor(
        Arc::clone(&registry) as Arc<dyn EndpointRegistry>,
        Arc::new(ScriptedTransport::offline()),
    );

    assert!(monitor.initialize(Uuid::new_v4()).await.is_err());
    assert_eq!(registry.current_id(), Some(known.id));
}

#[tokio::test(start_paused = true)]
async fn dropping_monitor_stops_polling() {
    let inverter = endpoint("inverter");
    let registry = Arc::new(InMemoryRegistry::with_endpoints([inverter.clone()]));
    let transport = Arc::new(ScriptedTransport::online("Status: Running"));
    let mut monitor = monitor(registry, Arc::clone(&transport));
    let mut rx = monitor.subscribe();

    monitor.initialize(inverter.id).await.expect("registered");
    rx.wait_for(|s| s.online).await.expect("monitor alive");
    drop(monitor);

    tokio::time::sleep(Duration::from_secs(INTERVAL_SECS * 5)).await;
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn manual_refresh_queries_once_more() {
    let inverter = endpoint("inverter");
    let registry = Arc::new(InMemoryRegistry::with_endpoints([inverter.clone()]));
    let transport = Arc::new(ScriptedTransport::online("Status: Running"));
    let mut monitor = monitor(registry, Arc::clone(&transport));

    // No endpoint yet: nothing to refresh
    monitor.refresh().await;
    assert_eq!(transport.call_count(), 0);

    let mut rx = monitor.subscribe();
    monitor.initialize(inverter.id).await.expect("registered");
    rx.wait_for(|s| s.online).await.expect("monitor alive");

    monitor.refresh().await;
    assert_eq!(transport.call_count(), 2);
    assert!(!monitor.snapshot().refreshing);
}

#[tokio::test(start_paused = true)]
async fn panicking_transport_counts_as_failure() {
    let inverter = endpoint("inverter");
    let registry = Arc::new(InMemoryRegistry::with_endpoints([inverter.clone()]));
    let mut monitor = ConnectionMonitor::new(
        registry,
        Arc::new(PanickingTransport),
        MonitorSettings::with_interval_secs(INTERVAL_SECS),
    );
    let mut rx = monitor.subscribe();

    monitor.initialize(inverter.id).await.expect("registered");
    rx.wait_for(|s| s.consecutive_failures == 2)
        .await
        .expect("monitor alive");
    assert!(monitor.is_running());
    assert!(!monitor.snapshot().online);
}

#[tokio::test(start_paused = true)]
async fn stop_then_initialize_other_starts_fresh() {
    let a = endpoint("a");
    let b = endpoint("b");
    let registry = Arc::new(InMemoryRegistry::with_endpoints([a.clone(), b.clone()]));
    let transport = Arc::new(ScriptedTransport::offline());
    let mut monitor = monitor(registry, Arc::clone(&transport));
    let mut rx = monitor.subscribe();

    monitor.initialize(a.id).await.expect("registered");
    rx.wait_for(|s| s.consecutive_failures == 2)
        .await
        .expect("monitor alive");
    monitor.shutdown().await;

    monitor.initialize(b.id).await.expect("registered");
    let snapshot = monitor.snapshot();
    assert_eq!(snapshot.endpoint_name(), Some("b"));
    assert_eq!(snapshot.state, MonitorState::Polling);
    assert_eq!(snapshot.consecutive_failures, 0);
    assert_eq!(snapshot.status, None);
    assert_eq!(snapshot.last_updated, LastUpdated::Never);

    let first = rx
        .wait_for(|s| s.last_updated != LastUpdated::Never)
        .await
        .expect("monitor alive")
        .clone();
    assert_eq!(first.consecutive_failures, 1);
    assert_eq!(transport.calls().last().map(|c| c.endpoint_id), Some(b.id));
}

#[tokio::test(start_paused = true)]
async fn not_found_clears_previous_endpoint_state() {
    let a = endpoint("a");
    let registry = Arc::new(InMemoryRegistry::with_endpoints([a.clone()]));
    let transport = Arc::new(ScriptedTransport::offline());
    let mut monitor = monitor(registry, Arc::clone(&transport));
    let mut rx = monitor.subscribe();

    monitor.initialize(a.id).await.expect("registered");
    rx.wait_for(|s| s.consecutive_failures == 1)
        .await
        .expect("monitor alive");
    monitor.shutdown().await;

    let missing = Uuid::new_v4();
    assert!(monitor.initialize(missing).await.is_err());
    let snapshot = monitor.snapshot();
    assert_eq!(snapshot.state, MonitorState::NotFound);
    assert_eq!(snapshot.consecutive_failures, 0);
    assert_eq!(snapshot.status, None);
    assert_eq!(snapshot.last_updated, LastUpdated::Never);
    assert!(!snapshot.online);
}

#[tokio::test(start_paused = true)]
async fn stop_during_refresh_publishes_result_and_halts() {
    let inverter = endpoint("inverter");
    let registry = Arc::new(InMemoryRegistry::with_endpoints([inverter.clone()]));
    let transport = Arc::new(ScriptedTransport::online("Status: Running").gated());
    let mut monitor = monitor(registry, Arc::clone(&transport));

    monitor.initialize(inverter.id).await.expect("registered");
    tokio::task::yield_now().await;
    assert_eq!(transport.call_count(), 1);
    assert!(monitor.snapshot().refreshing);

    monitor.stop();
    assert_eq!(monitor.snapshot().state, MonitorState::Stopped);

    transport.release();
    monitor.shutdown().await;

    let snapshot = monitor.snapshot();
    assert!(snapshot.online);
    assert!(!snapshot.refreshing);
    assert_eq!(snapshot.refreshes, 1);
    assert_eq!(snapshot.state, MonitorState::Stopped);
    assert_eq!(
        snapshot.status.map(|s| s.status),
        Some("Running".to_string())
    );

    tokio::time::sleep(Duration::from_secs(INTERVAL_SECS * 6)).await;
    assert_eq!(transport.call_count(), 1);
    assert_eq!(monitor.snapshot().state, MonitorState::Stopped);
}

#[tokio::test(start_paused = true)]
async fn refresh_counter_grows_on_success_and_failure() {
    let inverter = endpoint("inverter");
    let registry = Arc::new(InMemoryRegistry::with_endpoints([inverter.clone()]));
    let transport = Arc::new(
        ScriptedTransport::online("Status: OK")
            .then(Err(network_error()))
            .then(ok("Status: OK")),
    );
    let mut monitor = monitor(registry, Arc::clone(&transport));
    let mut rx = monitor.subscribe();

    monitor.initialize(inverter.id).await.expect("registered");
    let snapshot = rx
        .wait_for(|s| s.refreshes == 3)
        .await
        .expect("monitor alive")
        .clone();
    assert!(snapshot.online);
    assert_eq!(transport.call_count(), 3);

    monitor.refresh().await;
    assert_eq!(monitor.snapshot().refreshes, 4);
}
