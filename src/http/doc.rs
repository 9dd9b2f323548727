//! OpenAPI document for the HTTP API.
//!
//! Registers every route together with the request, response and error
//! schemas. The document is served as JSON at [`OPENAPI_PATH`] and browsed
//! through Swagger UI under [`DOCUMENTATION_PATH`].

use utoipa::OpenApi;

use crate::http::health::Liveness;
use crate::http::schemas::{
    ErrorSchema, HealthReportSchema, MemorySnapshotSchema, NormalizedResultSchema,
    NumberWordsSchema, OverallStatusSchema, PokemonSummarySchema, ServiceHealthSchema,
    ServiceStatusSchema,
};
use crate::http::server::Greeting;
use crate::http::unique_array::{UniqueArrayRequest, UniqueArrayResponse};

pub const DOCUMENTATION_PATH: &str = "/documentation";
pub const OPENAPI_PATH: &str = "/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "backend-challenge",
        description = "Array deduplication and aggregation of GraphQL, REST and SOAP upstreams."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::http::server::root,
        crate::http::unique_array::unique_array,
        crate::http::external_data::external_data,
        crate::http::health::health,
        crate::http::health::health_detailed,
    ),
    components(schemas(
        Greeting,
        UniqueArrayRequest,
        UniqueArrayResponse,
        Liveness,
        ErrorSchema,
        PokemonSummarySchema,
        NumberWordsSchema,
        NormalizedResultSchema,
        OverallStatusSchema,
        ServiceStatusSchema,
        ServiceHealthSchema,
        MemorySnapshotSchema,
        HealthReportSchema,
    )),
    tags(
        (name = "root", description = "Greeting"),
        (name = "unique-array", description = "Sort and deduplicate numbers"),
        (name = "external-data", description = "Normalized upstream data"),
        (name = "health", description = "Liveness and upstream health")
    )
)]
pub struct ApiDoc;
