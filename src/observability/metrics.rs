//! Metrics collection and exposition.
//!
//! # Metrics
//! - `redirect_router_requests_total` (counter): requests by status
//! - `redirect_router_request_duration_seconds` (histogram): latency distribution
//! - `redirect_router_redirects_total{permanent}` (counter): redirects by permanence
//! - `redirect_router_reloads_total` (counter): reloads by outcome
//! - `redirect_router_routes` (gauge): route count of the live table
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed (tests, metrics disabled)
//! - Prometheus exposition on its own listener

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(status: u16, start: Instant) {
    counter!("redirect_router_requests_total", "status" => status.to_string()).increment(1);
    histogram!("redirect_router_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_redirect(permanent: bool) {
    counter!("redirect_router_redirects_total", "permanent" => permanent.to_string()).increment(1);
}

pub fn record_reload(registered: bool, routes: usize) {
    let outcome = if registered { "registered" } else { "empty" };
    counter!("redirect_router_reloads_total", "outcome" => outcome).increment(1);
    gauge!("redirect_router_routes").set(routes as f64);
}
