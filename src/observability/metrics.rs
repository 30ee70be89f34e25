//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_routing_decisions_total` (counter): decisions by rule and kind
//! - `gateway_tenant_lookups_total` (counter): tenant resolution outcomes
//! - `gateway_upstream_requests_total` (counter): forwarded requests by method, status
//! - `gateway_upstream_duration_seconds` (histogram): upstream latency
//! - `gateway_upstream_retries_total` (counter): retry attempts
//!
//! # Design Decisions
//! - `metrics` facade; recording is a no-op until an exporter is installed
//! - Prometheus exporter serves its own scrape endpoint

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its HTTP scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_decision(rule: &'static str, kind: &'static str) {
    metrics::counter!("gateway_routing_decisions_total", "rule" => rule, "decision" => kind)
        .increment(1);
}

pub fn record_tenant_lookup(outcome: &'static str) {
    metrics::counter!("gateway_tenant_lookups_total", "outcome" => outcome).increment(1);
}

pub fn record_upstream(method: &str, status: u16, start: Instant) {
    let method = method.to_string();
    let status = status.to_string();
    metrics::counter!(
        "gateway_upstream_requests_total",
        "method" => method.clone(),
        "status" => status.clone()
    )
    .increment(1);
    metrics::histogram!(
        "gateway_upstream_duration_seconds",
        "method" => method,
        "status" => status
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_upstream_retry() {
    metrics::counter!("gateway_upstream_retries_total").increment(1);
}
