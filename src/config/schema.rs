//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the backend service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration for inbound requests.
    pub timeouts: TimeoutConfig,

    /// Upstream endpoints, deadlines and caching.
    pub upstream: UpstreamConfig,

    /// Rate limiting configuration.
    pub rate_limit: RateLimitConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Request hardening.
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// What to do when the identifying parameter for a source is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MissingParamPolicy {
    /// Substitute the configured default pokemon name or number.
    #[default]
    Defaults,
    /// Reject the request with a 400 before any upstream call.
    Reject,
}

/// Upstream protocol endpoints and call budgets.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// GraphQL endpoint (POST).
    pub graphql_url: String,

    /// REST base URL; the pokemon name is appended as a path segment.
    pub rest_base_url: String,

    /// WSDL document describing the number conversion SOAP service.
    pub soap_wsdl_url: String,

    /// Deadline for a data fetch in milliseconds.
    pub fetch_timeout_ms: u64,

    /// Deadline for each health probe in milliseconds.
    pub probe_timeout_ms: u64,

    /// Maximum age of a cached upstream result in milliseconds.
    pub cache_ttl_ms: u64,

    /// Pokemon looked up when the request names none.
    pub default_pokemon: String,

    /// Number converted when the request carries none.
    pub default_number: u64,

    /// Handling of absent `pokemon` / `number` parameters.
    pub missing_params: MissingParamPolicy,
}

impl UpstreamConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            graphql_url: "https://beta.pokeapi.co/graphql/v1beta".to_string(),
            rest_base_url: "https://pokeapi.co/api/v2/pokemon".to_string(),
            soap_wsdl_url:
                "https://www.dataaccess.com/webservicesserver/numberconversion.wso?WSDL"
                    .to_string(),
            fetch_timeout_ms: 5_000,
            probe_timeout_ms: 3_000,
            cache_ttl_ms: 60_000,
            default_pokemon: "pikachu".to_string(),
            default_number: 123,
            missing_params: MissingParamPolicy::Defaults,
        }
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable rate limiting.
    pub enabled: bool,

    /// Requests allowed per client within one window.
    pub max_requests: u32,

    /// Window length in seconds.
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: 100,
            window_secs: 60,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human readable, for development.
    #[default]
    Pretty,
    /// One JSON object per line, for production.
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 1024 * 1024, // 1MB
        }
    }
}
