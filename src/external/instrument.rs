//! Timing, logging and metrics around a single upstream call.

use std::future::Future;
use std::time::Instant;

use crate::external::error::UpstreamError;
use crate::external::types::Source;
use crate::observability::metrics;

impl UpstreamError {
    /// Metric label for the outcome of a failed call.
    pub fn outcome_label(&self) -> &'static str {
        match self {
            UpstreamError::Status { .. } => "status",
            UpstreamError::Timeout { .. } => "timeout",
            UpstreamError::NotFound(_) => "not_found",
            UpstreamError::Transport(_)
            | UpstreamError::Remote(_)
            | UpstreamError::Decode(_)
            | UpstreamError::Endpoint(_) => "error",
        }
    }
}

/// Await `call`, recording its latency and outcome against `origin`.
pub(crate) async fn observe_call<T, F>(
    origin: Source,
    operation: &'static str,
    call: F,
) -> Result<T, UpstreamError>
where
    F: Future<Output = Result<T, UpstreamError>>,
{
    let start = Instant::now();
    let result = call.await;

    let outcome = match &result {
        Ok(_) => "ok",
        Err(e) => e.outcome_label(),
    };
    metrics::record_upstream_call(origin.as_str(), operation, outcome, start);

    match &result {
        Ok(_) => tracing::debug!(
            source = %origin,
            operation,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Upstream call succeeded"
        ),
        Err(e) => tracing::warn!(
            source = %origin,
            operation,
            outcome,
            error = %e,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Upstream call failed"
        ),
    }

    result
}
