//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use extension_host::config::HostConfig;
use extension_host::{HostRegistry, HttpServer, ShutdownCoordinator};

/// Start a host with the given config and coordinator, bound to an
/// ephemeral port.
pub async fn start_host_with(
    config: &HostConfig,
    registry: HostRegistry,
    shutdown: Arc<ShutdownCoordinator>,
) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(config, Arc::new(registry), shutdown).unwrap();
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });

    // Let the listener settle before tests start hammering it.
    tokio::time::sleep(Duration::from_millis(50)).await;
    addr
}

/// Start a host over the given registry with default config.
pub async fn start_host(
    registry: HostRegistry,
    grace: Duration,
) -> (SocketAddr, Arc<ShutdownCoordinator>) {
    let shutdown = Arc::new(ShutdownCoordinator::new(grace));
    let addr = start_host_with(&HostConfig::default(), registry, Arc::clone(&shutdown)).await;
    (addr, shutdown)
}

/// Start a simple mock upstream that returns a fixed JSON response.
#[allow(dead_code)]
pub async fn start_mock_upstream(response: &'static str) -> SocketAddr {
    start_upstream(response, Duration::ZERO).await
}

/// Start a mock upstream that stalls before answering.
#[allow(dead_code)]
pub async fn start_slow_upstream(response: &'static str, delay: Duration) -> SocketAddr {
    start_upstream(response, delay).await
}

async fn start_upstream(response: &'static str, delay: Duration) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = [0u8; 4096];
                        let _ = socket.read(&mut buf).await;
                        if delay > Duration::ZERO {
                            tokio::time::sleep(delay).await;
                        }
                        let response_str = format!(
                            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            response.len(),
                            response
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Build a non-pooling client so each request opens a fresh connection.
#[allow(dead_code)]
pub fn test_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
