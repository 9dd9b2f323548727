//! Source dispatch for external-data requests.

use reqwest::Client;
use url::Url;

use crate::config::{MissingParamPolicy, UpstreamConfig};
use crate::external::cache::TtlCache;
use crate::external::error::{ExternalDataError, UpstreamError};
use crate::external::graphql::GraphQlAdapter;
use crate::external::rest::RestAdapter;
use crate::external::soap::SoapAdapter;
use crate::external::types::{FetchParams, NormalizedResult, Source};

/// Routes a request to the adapter for its source.
///
/// Adapter failures are passed through untouched, tagged with their source;
/// classification happens at the HTTP boundary.
#[derive(Debug, Clone)]
pub struct ExternalDataService {
    graphql: GraphQlAdapter,
    rest: RestAdapter,
    soap: SoapAdapter,
    missing_params: MissingParamPolicy,
}

impl ExternalDataService {
    pub fn new(
        graphql: GraphQlAdapter,
        rest: RestAdapter,
        soap: SoapAdapter,
        missing_params: MissingParamPolicy,
    ) -> Self {
        Self {
            graphql,
            rest,
            soap,
            missing_params,
        }
    }

    /// Build all three adapters from configuration, each with its own cache.
    pub fn from_config(http: Client, config: &UpstreamConfig) -> Result<Self, ExternalDataError> {
        let timeout = config.fetch_timeout();
        let ttl = config.cache_ttl();

        Ok(Self::new(
            GraphQlAdapter::new(
                http.clone(),
                parse_endpoint(Source::GraphQl, &config.graphql_url)?,
                timeout,
                config.default_pokemon.clone(),
                TtlCache::new(ttl),
            ),
            RestAdapter::new(
                http.clone(),
                parse_endpoint(Source::Rest, &config.rest_base_url)?,
                timeout,
                config.default_pokemon.clone(),
                TtlCache::new(ttl),
            ),
            SoapAdapter::new(
                http,
                parse_endpoint(Source::Soap, &config.soap_wsdl_url)?,
                timeout,
                config.default_number,
                TtlCache::new(ttl),
            ),
            config.missing_params,
        ))
    }

    /// Fetch from the named source. An unknown source fails before any
    /// adapter is touched.
    pub async fn fetch(
        &self,
        source: Option<&str>,
        params: &FetchParams,
    ) -> Result<NormalizedResult, ExternalDataError> {
        let source = Source::resolve(source)?;
        self.fetch_from(source, params).await
    }

    /// Fetch from an already-resolved source.
    pub async fn fetch_from(
        &self,
        source: Source,
        params: &FetchParams,
    ) -> Result<NormalizedResult, ExternalDataError> {
        self.check_required(source, params)?;

        let result = match source {
            Source::GraphQl => self.graphql.fetch(params).await.map(NormalizedResult::from),
            Source::Rest => self.rest.fetch(params).await.map(NormalizedResult::from),
            Source::Soap => self.soap.fetch(params).await.map(NormalizedResult::from),
        };

        result.map_err(|error| ExternalDataError::upstream(source, error))
    }

    fn check_required(
        &self,
        source: Source,
        params: &FetchParams,
    ) -> Result<(), ExternalDataError> {
        if self.missing_params == MissingParamPolicy::Defaults {
            return Ok(());
        }

        match source {
            Source::GraphQl | Source::Rest
                if params.pokemon_name.as_deref().map_or(true, str::is_empty) =>
            {
                Err(ExternalDataError::MissingParam("pokemon"))
            }
            Source::Soap if params.number.is_none() => {
                Err(ExternalDataError::MissingParam("number"))
            }
            _ => Ok(()),
        }
    }

    pub fn graphql(&self) -> &GraphQlAdapter {
        &self.graphql
    }

    pub fn rest(&self) -> &RestAdapter {
        &self.rest
    }

    pub fn soap(&self) -> &SoapAdapter {
        &self.soap
    }
}

fn parse_endpoint(source: Source, raw: &str) -> Result<Url, ExternalDataError> {
    Url::parse(raw).map_err(|e| {
        ExternalDataError::upstream(source, UpstreamError::Endpoint(format!("{}: {}", raw, e)))
    })
}
