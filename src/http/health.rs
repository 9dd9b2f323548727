//! `GET /health` and `GET /health/detailed`.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::health::report::now_rfc3339;
use crate::health::HealthReport;
use crate::http::schemas::HealthReportSchema;
use crate::http::server::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct Liveness {
    #[schema(value_type = String, example = "ok")]
    pub status: &'static str,
    #[schema(example = "2026-01-01T00:00:00.000Z")]
    pub timestamp: String,
}

/// Static liveness; never touches an upstream.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Process is up", body = Liveness)),
    tags = ["health"],
    operation_id = "health"
)]
pub async fn health() -> Json<Liveness> {
    Json(Liveness {
        status: "ok",
        timestamp: now_rfc3339(),
    })
}

/// Probe all upstreams. Always 200; degradation is reported in the body.
#[utoipa::path(
    get,
    path = "/health/detailed",
    responses((status = 200, description = "Per-upstream status", body = HealthReportSchema)),
    tags = ["health"],
    operation_id = "healthDetailed"
)]
pub async fn health_detailed(State(state): State<AppState>) -> Json<HealthReport> {
    Json(state.probe.detailed_check().await)
}
