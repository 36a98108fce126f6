//! Shared utilities for integration testing.

use std::net::SocketAddr;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A mock origin proxy serving a fixed body on every request, including
/// the preflight probes. Can be stopped mid-test to simulate an outage.
pub struct MockUpstream {
    pub addr: SocketAddr,
    server: JoinHandle<()>,
}

impl MockUpstream {
    /// Stop accepting connections; further connects are refused.
    pub fn stop(&self) {
        self.server.abort();
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Start a mock origin proxy answering every GET with the given JSON
/// body.
pub async fn start_upstream(body: String) -> MockUpstream {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let body = body.clone();
                    tokio::spawn(async move {
                        let response = format!(
                            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockUpstream { addr, server }
}

/// Raw routing document with one router/service pair, in the shape the
/// origin proxies publish on /api/rawdata.
pub fn rawdata_body(name: &str, rule: &str, server_count: usize) -> String {
    let servers: Vec<_> = (0..server_count)
        .map(|i| serde_json::json!({"url": format!("http://10.0.0.{i}:3000")}))
        .collect();

    serde_json::json!({
        "routers": {
            name: {"rule": rule, "status": "enabled"}
        },
        "services": {
            name: {"loadBalancer": {"servers": servers}, "status": "enabled"}
        }
    })
    .to_string()
}
