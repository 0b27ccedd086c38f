//! Shared utilities for integration tests.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use feed_shell::config::{AuthConfig, ShellConfig};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub const POOL_ID: &str = "us-east-1_KFMpUSnP5";
pub const CLIENT_ID: &str = "64s0p05ggkhfa6a8ni2ak9djf5";

/// A valid auth section for the us-east-1 test pool.
pub fn auth_config() -> AuthConfig {
    AuthConfig {
        region: "us-east-1".into(),
        user_pool_id: POOL_ID.into(),
        user_pool_web_client_id: CLIENT_ID.into(),
        ..AuthConfig::default()
    }
}

#[allow(dead_code)]
pub fn shell_config() -> ShellConfig {
    ShellConfig {
        auth: auth_config(),
        ..ShellConfig::default()
    }
}

/// Start a programmable HTTP backend on a free loopback port.
///
/// Every connection gets the `(status, json body)` returned by `f`, which is
/// given the backend's own address.
#[allow(dead_code)]
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(SocketAddr) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let f = f.clone();
            tokio::spawn(async move {
                // drain the request head before answering
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;

                let (status, body) = f(addr).await;
                let status_text = match status {
                    200 => "200 OK",
                    404 => "404 Not Found",
                    500 => "500 Internal Server Error",
                    503 => "503 Service Unavailable",
                    _ => "200 OK",
                };

                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_text,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
                tokio::time::sleep(Duration::from_millis(10)).await;
            });
        }
    });

    addr
}

/// Discovery document for `POOL_ID` served from `base`.
#[allow(dead_code)]
pub fn discovery_document(base: &str) -> String {
    serde_json::json!({
        "issuer": format!("{base}/{POOL_ID}"),
        "jwks_uri": format!("{base}/{POOL_ID}/.well-known/jwks.json"),
        "authorization_endpoint": format!("{base}/oauth2/authorize"),
        "token_endpoint": format!("{base}/oauth2/token"),
    })
    .to_string()
}
