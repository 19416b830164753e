//! HTTP transport against a local axum server

use std::net::SocketAddr;
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use openwatt_core::transport::TransportConfig;
use openwatt_core::{CommandTransport, Endpoint, HttpTransport, Scheme, TransportError};
use serde_json::{Value, json};

async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });
    addr
}

fn local(addr: SocketAddr) -> Endpoint {
    Endpoint::new("local", "127.0.0.1", addr.port(), Scheme::Http)
}

fn transport() -> HttpTransport {
    HttpTransport::new(TransportConfig::default()).expect("client builds")
}

async fn echo(Json(body): Json<Value>) -> Json<Value> {
    let command = body["command"].as_str().unwrap_or_default();
    Json(json!({
        "output": format!("ran {command}"),
        "exitCode": 0,
        "error": null,
    }))
}

#[tokio::test]
async fn execute_posts_command_and_decodes_response() {
    let addr = serve(Router::new().route("/api/cli/execute", post(echo))).await;

    let response = transport()
        .execute(&local(addr), "/system/sysinfo")
        .await
        .expect("command succeeds");

    assert_eq!(response.output, "ran /system/sysinfo");
    assert_eq!(response.exit_code, 0);
    assert!(!response.has_error());
}

#[tokio::test]
async fn execute_accepts_missing_optional_fields() {
    let addr = serve(Router::new().route(
        "/api/cli/execute",
        post(|| async { Json(json!({ "output": "Status: OK" })) }),
    ))
    .await;

    let response = transport()
        .execute(&local(addr), "status")
        .await
        .expect("command succeeds");
    assert_eq!(response.output, "Status: OK");
    assert_eq!(response.error, None);
}

#[tokio::test]
async fn execute_passes_structured_error_through() {
    let addr = serve(Router::new().route(
        "/api/cli/execute",
        post(|| async {
            Json(json!({ "output": "", "exitCode": 1, "error": "unknown command" }))
        }),
    ))
    .await;

    let response = transport()
        .execute(&local(addr), "bogus")
        .await
        .expect("transport succeeds");
    assert_eq!(response.exit_code, 1);
    assert_eq!(response.error.as_deref(), Some("unknown command"));
}

#[tokio::test]
async fn server_error_maps_to_http_status() {
    let addr = serve(Router::new().route(
        "/api/cli/execute",
        post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    ))
    .await;

    let err = transport()
        .execute(&local(addr), "status")
        .await
        .expect_err("server error");
    assert_eq!(err, TransportError::http_status(500));
    assert_eq!(err.to_string(), "HTTP 500: Internal Server Error");
    assert_eq!(err.status_code(), Some(500));
}

#[tokio::test]
async fn missing_route_maps_to_not_found() {
    let addr = serve(Router::new()).await;

    let err = transport()
        .execute(&local(addr), "status")
        .await
        .expect_err("no route");
    assert_eq!(err.to_string(), "HTTP 404: Not Found");
}

#[tokio::test]
async fn empty_body_is_rejected() {
    let addr = serve(Router::new().route("/api/cli/execute", post(|| async { "" }))).await;

    let err = transport()
        .execute(&local(addr), "status")
        .await
        .expect_err("empty body");
    assert_eq!(err, TransportError::EmptyBody);
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let addr = serve(Router::new().route(
        "/api/cli/execute",
        post(|| async { "<html>gateway</html>" }),
    ))
    .await;

    let err = transport()
        .execute(&local(addr), "status")
        .await
        .expect_err("malformed body");
    assert!(matches!(err, TransportError::DecodeError(_)));
    assert!(err.to_string().starts_with("Malformed response: "));
}

#[tokio::test]
async fn refused_connection_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let err = transport()
        .execute(&local(addr), "status")
        .await
        .expect_err("nothing listening");
    assert!(err.is_network());
    assert_eq!(err.status_code(), None);
}

#[tokio::test]
async fn slow_response_times_out() {
    let addr = serve(Router::new().route(
        "/api/cli/execute",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({ "output": "late" }))
        }),
    ))
    .await;

    let config = TransportConfig {
        connect_timeout: Duration::from_millis(200),
        read_timeout: Duration::from_millis(200),
        write_timeout: Duration::from_millis(200),
    };
    let transport = HttpTransport::new(config).expect("client builds");

    let err = transport
        .execute(&local(addr), "status")
        .await
        .expect_err("timed out");
    assert!(err.is_network());
}

#[tokio::test]
async fn probe_reports_health() {
    let addr = serve(Router::new().route("/api/health", get(|| async { "OK" }))).await;
    transport().probe(&local(addr)).await.expect("healthy");
}

#[tokio::test]
async fn probe_fails_on_non_success() {
    let addr = serve(Router::new().route(
        "/api/health",
        get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
    ))
    .await;

    let err = transport()
        .probe(&local(addr))
        .await
        .expect_err("unhealthy");
    assert_eq!(err.status_code(), Some(503));
}
