//! Fan-out liveness probe over the three upstreams.
//!
//! The three checks run concurrently, each with its own deadline. One
//! failing check never cancels or delays the others.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::external::{ExternalDataService, Source};
use crate::health::report::{HealthReport, ServiceHealth};
use crate::observability::metrics;

pub struct HealthProbe {
    service: Arc<ExternalDataService>,
    timeout: Duration,
    started_at: Instant,
}

impl HealthProbe {
    pub fn new(service: Arc<ExternalDataService>, timeout: Duration) -> Self {
        Self {
            service,
            timeout,
            started_at: Instant::now(),
        }
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Probe every upstream and build a report.
    pub async fn detailed_check(&self) -> HealthReport {
        let (graphql, rest, soap) = tokio::join!(
            self.service.graphql().ping(self.timeout),
            self.service.rest().ping(self.timeout),
            self.service.soap().connect(self.timeout),
        );

        let services: BTreeMap<Source, ServiceHealth> = BTreeMap::from([
            (Source::GraphQl, ServiceHealth::from(graphql)),
            (Source::Rest, ServiceHealth::from(rest)),
            (Source::Soap, ServiceHealth::from(soap)),
        ]);

        for (source, health) in &services {
            metrics::record_service_health(source.as_str(), health.is_ok());
        }

        let report = HealthReport::new(services, self.uptime());
        tracing::info!(
            event = "health_check",
            status = ?report.status,
            graphql = ?report.services[&Source::GraphQl].status,
            rest = ?report.services[&Source::Rest].status,
            soap = ?report.services[&Source::Soap].status,
            "Health check completed"
        );
        report
    }
}
