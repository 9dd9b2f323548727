//! Metrics collection and exposition.
//!
//! # Metrics
//! - `http_requests_total` (counter): requests by method, route, status
//! - `http_request_duration_seconds` (histogram): end-to-end latency
//! - `upstream_requests_total` (counter): upstream calls by source, operation, outcome
//! - `upstream_request_duration_seconds` (histogram): upstream latency by source
//! - `cache_lookups_total` (counter): cache hits and misses by source
//! - `health_check_status` (gauge): 1=ok, 0=error, per service
//! - `rate_limited_total` (counter): requests rejected by the limiter
//!
//! # Design Decisions
//! - Recording is a no-op until [`init_metrics`] installs a recorder, so
//!   tests and metrics-disabled runs pay nothing
//! - Route labels use the matched route template, never the raw path

use std::net::SocketAddr;
use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use thiserror::Error;

const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("metrics configuration error: {0}")]
    Configuration(String),
    #[error("metrics installation error: {0}")]
    Installation(String),
}

/// Install the Prometheus recorder and its scrape listener on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), MetricsError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .set_buckets(LATENCY_BUCKETS)
        .map_err(|e| MetricsError::Configuration(e.to_string()))?
        .install()
        .map_err(|e| MetricsError::Installation(e.to_string()))?;

    tracing::info!(address = %addr, "Prometheus metrics exporter started");
    Ok(())
}

pub fn record_request(method: &str, path: &str, status: u16, start: Instant) {
    counter!(
        "http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record one upstream call. `outcome` is `ok` or a failure label.
pub fn record_upstream_call(source: &str, operation: &str, outcome: &str, start: Instant) {
    counter!(
        "upstream_requests_total",
        "source" => source.to_string(),
        "operation" => operation.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);

    histogram!(
        "upstream_request_duration_seconds",
        "source" => source.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_cache_lookup(source: &str, hit: bool) {
    counter!(
        "cache_lookups_total",
        "source" => source.to_string(),
        "result" => if hit { "hit" } else { "miss" }
    )
    .increment(1);
}

pub fn record_service_health(service: &str, healthy: bool) {
    gauge!("health_check_status", "service" => service.to_string())
        .set(if healthy { 1.0 } else { 0.0 });
}

pub fn record_rate_limited(reason: &str) {
    counter!("rate_limited_total", "reason" => reason.to_string()).increment(1);
}

/// Axum middleware recording request count and latency.
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());

    let response = next.run(req).await;
    record_request(&method, &path, response.status().as_u16(), start);
    response
}
