//! REST adapter for pokemon lookups.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::external::cache::TtlCache;
use crate::external::error::UpstreamError;
use crate::external::instrument::observe_call;
use crate::external::types::{deserialize_id, FetchParams, PokemonSummary, Source};
use crate::observability::metrics;

#[derive(Debug, Deserialize)]
struct RawPokemon {
    #[serde(deserialize_with = "deserialize_id")]
    id: u64,
    name: String,
    #[serde(default)]
    types: Vec<RawTypeSlot>,
}

#[derive(Debug, Deserialize)]
struct RawTypeSlot {
    #[serde(rename = "type")]
    kind: RawTypeName,
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
            types: raw.types.into_iter().map(|slot| slot.kind.name).collect(),
        }
    }
}

/// Fetches pokemon from a `{base}/{name}` resource.
#[derive(Debug, Clone)]
pub struct RestAdapter {
    http: Client,
    base_url: Url,
    timeout: Duration,
    default_pokemon: String,
    cache: TtlCache<PokemonSummary>,
}

impl RestAdapter {
    pub fn new(
        http: Client,
        base_url: Url,
        timeout: Duration,
        default_pokemon: String,
        cache: TtlCache<PokemonSummary>,
    ) -> Self {
        Self {
            http,
            base_url,
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
            metrics::record_cache_lookup(Source::Rest.as_str(), true);
            tracing::debug!(source = %Source::Rest, pokemon = %name, "Cache hit");
            return Ok(hit);
        }
        metrics::record_cache_lookup(Source::Rest.as_str(), false);

        let summary = observe_call(Source::Rest, "get", self.get_pokemon(name)).await?;
        self.cache.set(name, summary.clone());
        Ok(summary)
    }

    async fn get_pokemon(&self, name: &str) -> Result<PokemonSummary, UpstreamError> {
        let response = self.get(self.resource_url(name)?, self.timeout).await?;
        let raw: RawPokemon = response
            .json()
            .await
            .map_err(|e| UpstreamError::from_reqwest(e, self.timeout.as_millis() as u64))?;
        Ok(raw.into())
    }

    /// Minimal liveness request against the first pokemon.
    pub async fn ping(&self, timeout: Duration) -> Result<(), UpstreamError> {
        observe_call(Source::Rest, "ping", async {
            self.get(self.resource_url("1")?, timeout).await.map(|_| ())
        })
        .await
    }

    /// Resource URL for `name`, appended as an escaped path segment.
    pub fn resource_url(&self, name: &str) -> Result<Url, UpstreamError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamError::Endpoint(self.base_url.to_string()))?
            .pop_if_empty()
            .push(name);
        Ok(url)
    }

    async fn get(&self, url: Url, timeout: Duration) -> Result<reqwest::Response, UpstreamError> {
        let response = self
            .http
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(e, timeout.as_millis() as u64))?;
        UpstreamError::check_status(&response)?;
        Ok(response)
    }
}
