//! OpenAPI schema definitions for domain types.
//!
//! The `external` and `health` types stay free of `utoipa`. These wrappers
//! mirror their serialized shape and exist only for the generated document.

#![allow(dead_code)]

use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

/// Body of every failed request.
#[derive(ToSchema)]
#[schema(as = ErrorBody)]
pub struct ErrorSchema {
    #[schema(example = "Bad Request: Invalid external data source specified.")]
    error: String,
}

/// A pokemon served by the GraphQL or REST source.
#[derive(Serialize, ToSchema)]
#[schema(as = PokemonSummary)]
pub struct PokemonSummarySchema {
    #[schema(example = 25)]
    id: u64,
    #[schema(example = "pikachu")]
    name: String,
    /// Type names in upstream order.
    #[schema(example = json!(["electric"]))]
    types: Vec<String>,
}

/// A number spelled out by the SOAP source.
#[derive(Serialize, ToSchema)]
#[schema(as = NumberWords)]
pub struct NumberWordsSchema {
    #[schema(example = "one hundred and twenty three")]
    result: String,
}

/// Result of `GET /external-data`; the shape follows the requested source.
#[derive(Serialize, ToSchema)]
#[serde(untagged)]
#[schema(as = NormalizedResult)]
pub enum NormalizedResultSchema {
    Pokemon(PokemonSummarySchema),
    Words(NumberWordsSchema),
}

#[derive(ToSchema)]
#[schema(as = OverallStatus)]
pub enum OverallStatusSchema {
    #[schema(rename = "ok")]
    Ok,
    #[schema(rename = "degraded")]
    Degraded,
}

#[derive(ToSchema)]
#[schema(as = ServiceStatus)]
pub enum ServiceStatusSchema {
    #[schema(rename = "ok")]
    Ok,
    #[schema(rename = "error")]
    Error,
    #[schema(rename = "unknown")]
    Unknown,
}

/// Outcome of one upstream check.
#[derive(ToSchema)]
#[schema(as = ServiceHealth)]
pub struct ServiceHealthSchema {
    status: ServiceStatusSchema,
    /// Present only when the check failed.
    message: Option<String>,
}

#[derive(ToSchema)]
#[schema(as = MemorySnapshot)]
pub struct MemorySnapshotSchema {
    #[schema(example = "42MB")]
    rss: String,
    #[schema(rename = "virtual", example = "1024MB")]
    virtual_size: String,
}

/// Body of `GET /health/detailed`.
#[derive(ToSchema)]
#[schema(as = HealthReport)]
pub struct HealthReportSchema {
    status: OverallStatusSchema,
    #[schema(example = "2026-01-01T00:00:00.000Z")]
    timestamp: String,
    /// Seconds since process start.
    uptime: f64,
    host: String,
    /// Keyed by `graphql`, `rest` and `soap`.
    services: BTreeMap<String, ServiceHealthSchema>,
    /// Omitted where the platform does not expose it.
    memory: Option<MemorySnapshotSchema>,
}
