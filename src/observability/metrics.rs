//! Metrics collection and exposition.
//!
//! # Metrics
//! - `feed_shell_route_resolutions_total` (counter): by page and outcome
//! - `feed_shell_auth_bootstrap_total` (counter): bootstrap transitions by status
//! - `feed_shell_requests_total` (counter): HTTP requests by method and status
//! - `feed_shell_request_duration_seconds` (histogram): HTTP latency
//!
//! Recording is a no-op until a recorder is installed, so library code and
//! tests can call these freely.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record a route resolution. `page` is "none" when nothing matched.
pub fn record_resolution(page: &'static str, outcome: &'static str) {
    counter!("feed_shell_route_resolutions_total", "page" => page, "outcome" => outcome).increment(1);
}

pub fn record_bootstrap(status: &'static str) {
    counter!("feed_shell_auth_bootstrap_total", "status" => status).increment(1);
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    let method = method.to_string();
    let status = status.to_string();
    counter!("feed_shell_requests_total", "method" => method.clone(), "status" => status.clone())
        .increment(1);
    histogram!("feed_shell_request_duration_seconds", "method" => method, "status" => status)
        .record(start.elapsed().as_secs_f64());
}
