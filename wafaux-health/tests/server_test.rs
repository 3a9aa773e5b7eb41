//! End-to-end tests against a bound relay
//!
//! Requests go over real TCP connections so that the per-connection
//! concurrency of the server is exercised, not just the router.
#![allow(clippy::expect_used, clippy::unwrap_used)]

mod support;

use std::{
    net::SocketAddr,
    sync::Arc,
    time::{Duration, Instant},
};

use support::{SlowProbe, TOKEN, token_auth};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
    sync::broadcast,
    task::JoinHandle,
};
use wafaux_common::Signal;
use wafaux_health::{HealthConfig, HealthError, HealthProbe, HealthServer};

async fn start(
    probe: Arc<dyn HealthProbe>,
) -> (
    SocketAddr,
    broadcast::Sender<Signal>,
    JoinHandle<Result<(), HealthError>>,
) {
    let config = HealthConfig {
        listen_address: "127.0.0.1:0".to_string(),
        ..HealthConfig::default()
    };
    let server = HealthServer::new(&config, token_auth(), probe)
        .await
        .unwrap();
    let addr = server.local_addr().unwrap();
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let handle = tokio::spawn(server.serve(shutdown_rx));
    (addr, shutdown_tx, handle)
}

/// Minimal HTTP/1.1 GET returning the status code and body
async fn http_get(addr: SocketAddr, path: &str, token: Option<&str>) -> (u16, String) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let mut request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n");
    if let Some(token) = token {
        request.push_str(&format!("Authorization: Bearer {token}\r\n"));
    }
    request.push_str("\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.unwrap();
    let raw = String::from_utf8(raw).unwrap();

    let status = raw
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse().ok())
        .unwrap();
    let body = raw
        .split_once("\r\n\r\n")
        .map(|(_, body)| body.to_string())
        .unwrap_or_default();
    (status, body)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_slow_check_does_not_block_liveness() {
    let (addr, shutdown, handle) = start(Arc::new(SlowProbe {
        delay: Duration::from_secs(3),
    }))
    .await;

    let slow = tokio::spawn(async move { http_get(addr, "/engine/v1/health", Some(TOKEN)).await });

    // Let the slow request reach the probe first
    tokio::time::sleep(Duration::from_millis(100)).await;

    let started = Instant::now();
    let (status, body) = http_get(addr, "/health", None).await;
    assert_eq!(status, 200);
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&body).unwrap(),
        serde_json::json!({ "status": "ok" })
    );
    assert!(
        started.elapsed() < Duration::from_secs(1),
        "liveness took {:?} behind a slow check",
        started.elapsed()
    );
    assert!(!slow.is_finished());

    let (status, _) = slow.await.unwrap();
    assert_eq!(status, 200);

    shutdown.send(Signal::Shutdown).unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_checks_run_in_parallel() {
    let (addr, shutdown, handle) = start(Arc::new(SlowProbe {
        delay: Duration::from_millis(800),
    }))
    .await;

    let started = Instant::now();
    let requests: Vec<_> = (0..4)
        .map(|_| tokio::spawn(async move { http_get(addr, "/engine/v1/health", Some(TOKEN)).await }))
        .collect();
    for request in requests {
        assert_eq!(request.await.unwrap().0, 200);
    }

    // Serially this would take at least 3.2s
    assert!(started.elapsed() < Duration::from_millis(2500));

    shutdown.send(Signal::Shutdown).unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_bind_failure_is_reported() {
    let occupied = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let config = HealthConfig {
        listen_address: occupied.local_addr().unwrap().to_string(),
        ..HealthConfig::default()
    };

    let result = HealthServer::new(
        &config,
        token_auth(),
        Arc::new(SlowProbe {
            delay: Duration::ZERO,
        }),
    )
    .await;

    assert!(matches!(result, Err(HealthError::BindError { .. })));
}

#[tokio::test]
async fn test_shutdown_signal_stops_server() {
    let (addr, shutdown, handle) = start(Arc::new(SlowProbe {
        delay: Duration::ZERO,
    }))
    .await;

    assert_eq!(http_get(addr, "/health", None).await.0, 200);

    shutdown.send(Signal::Shutdown).unwrap();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
}
