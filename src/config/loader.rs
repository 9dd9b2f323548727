//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{AppConfig, LogFormat};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: '{value}'")]
    Env { var: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from a TOML file without validating it.
pub fn load_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Resolve the effective configuration: optional file, then environment
/// overrides, then validation.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let config = match path {
        Some(path) => load_file(path)?,
        None => AppConfig::default(),
    };
    let config = apply_env_overrides(config, |var| std::env::var(var).ok())?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay the deployment environment variables onto `config`.
///
/// `lookup` returns the value of a variable if it is set.
pub fn apply_env_overrides<F>(mut config: AppConfig, lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let host = lookup("HOST");
    let port = lookup("PORT");
    if host.is_some() || port.is_some() {
        let (current_host, current_port) = config
            .listener
            .bind_address
            .rsplit_once(':')
            .map(|(h, p)| (h.to_string(), p.to_string()))
            .unwrap_or_else(|| (config.listener.bind_address.clone(), "3000".to_string()));

        if let Some(port) = &port {
            if port.parse::<u16>().is_err() {
                return Err(ConfigError::Env {
                    var: "PORT",
                    value: port.clone(),
                });
            }
        }

        config.listener.bind_address = format!(
            "{}:{}",
            host.unwrap_or(current_host),
            port.unwrap_or(current_port)
        );
    }

    if let Some(level) = lookup("LOG_LEVEL") {
        config.observability.log_level = level;
    }

    let environment = lookup("NODE_ENV").or_else(|| lookup("APP_ENV"));
    if environment.as_deref() == Some("production") {
        config.observability.log_format = LogFormat::Json;
    }

    if let Some(format) = lookup("LOG_FORMAT") {
        config.observability.log_format = match format.as_str() {
            "json" => LogFormat::Json,
            "pretty" => LogFormat::Pretty,
            _ => {
                return Err(ConfigError::Env {
                    var: "LOG_FORMAT",
                    value: format,
                })
            }
        };
    }

    if let Some(max) = lookup("RATE_LIMIT_MAX") {
        config.rate_limit.max_requests = max.parse().map_err(|_| ConfigError::Env {
            var: "RATE_LIMIT_MAX",
            value: max.clone(),
        })?;
    }

    if let Some(window) = lookup("RATE_LIMIT_WINDOW") {
        config.rate_limit.window_secs =
            parse_window_secs(&window).ok_or(ConfigError::Env {
                var: "RATE_LIMIT_WINDOW",
                value: window,
            })?;
    }

    if let Some(window) = lookup("RATE_LIMIT_WINDOW_SECS") {
        config.rate_limit.window_secs = window.parse().map_err(|_| ConfigError::Env {
            var: "RATE_LIMIT_WINDOW_SECS",
            value: window.clone(),
        })?;
    }

    Ok(config)
}

/// Parse a rate limit window such as `60000`, `30 seconds` or `1 minute`
/// into whole seconds, rounding up. A bare number is milliseconds.
fn parse_window_secs(value: &str) -> Option<u64> {
    let value = value.trim();
    let split = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    let (amount, unit) = value.split_at(split);
    let amount: u64 = amount.parse().ok()?;

    let millis_per_unit = match unit.trim().to_ascii_lowercase().as_str() {
        "" | "ms" | "millisecond" | "milliseconds" => 1,
        "s" | "sec" | "secs" | "second" | "seconds" => 1_000,
        "m" | "min" | "mins" | "minute" | "minutes" => 60_000,
        "h" | "hr" | "hrs" | "hour" | "hours" => 3_600_000,
        "d" | "day" | "days" => 86_400_000,
        _ => return None,
    };

    Some(amount.checked_mul(millis_per_unit)?.div_ceil(1_000))
}
