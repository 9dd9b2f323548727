//! GraphQL adapter for pokemon lookups.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::external::cache::TtlCache;
use crate::external::error::UpstreamError;
use crate::external::instrument::observe_call;
use crate::external::types::{deserialize_id, FetchParams, PokemonSummary, Source};
use crate::observability::metrics;

const POKEMON_QUERY: &str = r#"
    query getPokemon($name: String!) {
      pokemon_v2_pokemon(where: { name: { _eq: $name } }) {
        id
        name
        pokemon_v2_pokemontypes {
          pokemon_v2_type {
            name
          }
        }
      }
    }
"#;

const PING_QUERY: &str = "{ pokemon_v2_pokemon(limit: 1) { id name } }";

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlMessage>,
}

#[derive(Debug, Deserialize)]
struct GraphQlMessage {
    message: String,
}

#[derive(Debug, Deserialize)]
struct PokemonQueryData {
    #[serde(default)]
    pokemon_v2_pokemon: Option<Vec<RawPokemon>>,
}

#[derive(Debug, Deserialize)]
struct RawPokemon {
    #[serde(deserialize_with = "deserialize_id")]
    id: u64,
    name: String,
    #[serde(default)]
    pokemon_v2_pokemontypes: Vec<RawPokemonType>,
}

#[derive(Debug, Deserialize)]
struct RawPokemonType {
    pokemon_v2_type: RawTypeName,
}

#[derive(Debug, Deserialize)]
struct RawTypeName {
    name: String,
}

impl From<RawPokemon> for PokemonSummary {
    fn from(raw: RawPokemon) -> Self {
        PokemonSummary {
            id: raw.id,
            name: raw.name,
            types: raw
                .pokemon_v2_pokemontypes
                .into_iter()
                .map(|t| t.pokemon_v2_type.name)
                .collect(),
        }
    }
}

/// Fetches pokemon through a single GraphQL query.
#[derive(Debug, Clone)]
pub struct GraphQlAdapter {
    http: Client,
    endpoint: Url,
    timeout: Duration,
    default_pokemon: String,
    cache: TtlCache<PokemonSummary>,
}

impl GraphQlAdapter {
    pub fn new(
        http: Client,
        endpoint: Url,
        timeout: Duration,
        default_pokemon: String,
        cache: TtlCache<PokemonSummary>,
    ) -> Self {
        Self {
            http,
            endpoint,
            timeout,
            default_pokemon,
            cache,
        }
    }

    /// Look up a pokemon by name, consulting the cache first.
    pub async fn fetch(&self, params: &FetchParams) -> Result<PokemonSummary, UpstreamError> {
        let name = params
            .pokemon_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.default_pokemon);

        if let Some(hit) = self.cache.get(name) {
            metrics::record_cache_lookup(Source::GraphQl.as_str(), true);
            tracing::debug!(source = %Source::GraphQl, pokemon = %name, "Cache hit");
            return Ok(hit);
        }
        metrics::record_cache_lookup(Source::GraphQl.as_str(), false);

        let summary = observe_call(Source::GraphQl, "query", self.query(name)).await?;
        self.cache.set(name, summary.clone());
        Ok(summary)
    }

    async fn query(&self, name: &str) -> Result<PokemonSummary, UpstreamError> {
        let body = json!({
            "query": POKEMON_QUERY,
            "variables": { "name": name },
            "operationName": "getPokemon",
        });
        let response = self.post(&body, self.timeout).await?;

        let payload: GraphQlResponse<PokemonQueryData> = response
            .json()
            .await
            .map_err(|e| UpstreamError::from_reqwest(e, self.timeout_ms()))?;

        if !payload.errors.is_empty() {
            let messages: Vec<_> = payload.errors.into_iter().map(|e| e.message).collect();
            return Err(UpstreamError::Remote(messages.join("; ")));
        }

        let data = payload
            .data
            .ok_or_else(|| UpstreamError::Decode("response carried no data".to_string()))?;

        data.pokemon_v2_pokemon
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(PokemonSummary::from)
            .ok_or_else(|| UpstreamError::NotFound("Pokemon not found".to_string()))
    }

    /// Minimal liveness query.
    pub async fn ping(&self, timeout: Duration) -> Result<(), UpstreamError> {
        observe_call(Source::GraphQl, "ping", async {
            self.post(&json!({ "query": PING_QUERY }), timeout).await.map(|_| ())
        })
        .await
    }

    async fn post(
        &self,
        body: &serde_json::Value,
        timeout: Duration,
    ) -> Result<reqwest::Response, UpstreamError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .timeout(timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(e, timeout.as_millis() as u64))?;
        UpstreamError::check_status(&response)?;
        Ok(response)
    }

    fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }
}
