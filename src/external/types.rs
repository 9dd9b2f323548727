//! Shared data types for external-data aggregation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::external::error::ExternalDataError;

/// Upstream protocol a request is served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    GraphQl,
    Rest,
    Soap,
}

impl Source {
    pub const ALL: [Source; 3] = [Source::GraphQl, Source::Rest, Source::Soap];

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::GraphQl => "graphql",
            Source::Rest => "rest",
            Source::Soap => "soap",
        }
    }

    /// Parse an optional `source` query value. Absent or empty means GraphQL.
    pub fn resolve(raw: Option<&str>) -> Result<Self, ExternalDataError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Source::GraphQl),
            Some(value) => value.parse(),
        }
    }
}

impl FromStr for Source {
    type Err = ExternalDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "graphql" => Ok(Source::GraphQl),
            "rest" => Ok(Source::Rest),
            "soap" => Ok(Source::Soap),
            _ => Err(ExternalDataError::InvalidSource(s.to_string())),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of an external-data request. Which field matters depends on
/// the source: GraphQL and REST read `pokemon_name`, SOAP reads `number`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchParams {
    pub pokemon_name: Option<String>,
    pub number: Option<u64>,
}

impl FetchParams {
    pub fn pokemon(name: impl Into<String>) -> Self {
        Self {
            pokemon_name: Some(name.into()),
            number: None,
        }
    }

    pub fn number(number: u64) -> Self {
        Self {
            pokemon_name: None,
            number: Some(number),
        }
    }
}

/// Identity and elemental types of a pokemon, as returned by GraphQL and REST.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonSummary {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: u64,
    pub name: String,
    /// Type names in upstream order.
    pub types: Vec<String>,
}

/// Textual conversion of a number, as returned by SOAP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberWords {
    pub result: String,
}

/// Normalized upstream result. The shape follows the source; callers
/// discriminate on the source they asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NormalizedResult {
    Pokemon(PokemonSummary),
    Words(NumberWords),
}

impl From<PokemonSummary> for NormalizedResult {
    fn from(summary: PokemonSummary) -> Self {
        NormalizedResult::Pokemon(summary)
    }
}

impl From<NumberWords> for NormalizedResult {
    fn from(words: NumberWords) -> Self {
        NormalizedResult::Words(words)
    }
}

/// Upstreams disagree on whether ids are numbers or numeric strings.
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(id) => Ok(id),
        RawId::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid pokemon id '{}'", text))),
    }
}
