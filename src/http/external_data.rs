//! `GET /external-data`.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::external::{ExternalDataError, FetchParams, NormalizedResult, Source};
use crate::http::schemas::{ErrorSchema, NormalizedResultSchema};
use crate::http::server::AppState;

/// Raw query string. Everything arrives as text and is parsed here so a bad
/// `number` answers with the same error shape as every other failure.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExternalDataQuery {
    /// `graphql` (default), `rest` or `soap`; case-insensitive.
    #[param(example = "rest")]
    pub source: Option<String>,
    /// Pokemon name for the GraphQL and REST sources.
    #[param(example = "pikachu")]
    pub pokemon: Option<String>,
    /// Non-negative integer for the SOAP source.
    #[param(example = "123")]
    pub number: Option<String>,
}

impl ExternalDataQuery {
    /// Resolve the source, then parse only the parameter that source reads.
    pub fn parse(self) -> Result<(Source, FetchParams), ExternalDataError> {
        let source = Source::resolve(self.source.as_deref())?;

        let params = match source {
            Source::GraphQl | Source::Rest => FetchParams {
                pokemon_name: self.pokemon.map(|p| p.trim().to_string()),
                number: None,
            },
            Source::Soap => FetchParams {
                pokemon_name: None,
                number: parse_number(self.number.as_deref())?,
            },
        };

        Ok((source, params))
    }
}

fn parse_number(raw: Option<&str>) -> Result<Option<u64>, ExternalDataError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ExternalDataError::InvalidParam {
                name: "number",
                reason: format!("'{}' is not a non-negative integer", value),
            }),
    }
}

#[utoipa::path(
    get,
    path = "/external-data",
    params(ExternalDataQuery),
    responses(
        (status = 200, description = "Normalized upstream result", body = NormalizedResultSchema),
        (status = 400, description = "Invalid source or parameter", body = ErrorSchema),
        (status = 404, description = "Upstream answered 404", body = ErrorSchema),
        (status = 429, description = "Upstream rate limit exceeded", body = ErrorSchema),
        (status = 500, description = "Unexpected upstream failure", body = ErrorSchema),
        (status = 503, description = "Upstream unavailable", body = ErrorSchema),
        (status = 504, description = "Upstream timed out", body = ErrorSchema)
    ),
    tags = ["external-data"],
    operation_id = "externalData"
)]
pub async fn external_data(
    State(state): State<AppState>,
    Query(query): Query<ExternalDataQuery>,
) -> Result<Json<NormalizedResult>, ExternalDataError> {
    let (source, params) = query.parse()?;

    tracing::info!(
        source = %source,
        pokemon = params.pokemon_name.as_deref(),
        number = params.number,
        "Fetching external data"
    );

    let result = state.service.fetch_from(source, &params).await?;
    Ok(Json(result))
}
