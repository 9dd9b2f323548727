//! Health report shapes.
//!
//! A report is built fresh per probe and never cached. Only the per-service
//! outcomes feed the overall status; uptime, host and memory are
//! informational.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::external::{Source, UpstreamError};

const PAGE_SIZE: u64 = 4096;

/// Composite status. Total failure still reports `degraded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    Ok,
    Degraded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Ok,
    Error,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceHealth {
    pub status: ServiceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ServiceHealth {
    pub fn ok() -> Self {
        Self {
            status: ServiceStatus::Ok,
            message: None,
        }
    }

    pub fn unknown() -> Self {
        Self {
            status: ServiceStatus::Unknown,
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ServiceStatus::Error,
            message: Some(message.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == ServiceStatus::Ok
    }
}

impl<T> From<Result<T, UpstreamError>> for ServiceHealth {
    fn from(result: Result<T, UpstreamError>) -> Self {
        match result {
            Ok(_) => ServiceHealth::ok(),
            Err(e) => ServiceHealth::error(e.to_string()),
        }
    }
}

/// Resident and virtual size of this process, as `"<n>MB"` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemorySnapshot {
    pub rss: String,
    #[serde(rename = "virtual")]
    pub virtual_size: String,
}

impl MemorySnapshot {
    /// Read `/proc/self/statm`. `None` where it is unavailable.
    pub fn current() -> Option<Self> {
        let statm = std::fs::read_to_string("/proc/self/statm").ok()?;
        Self::from_statm(&statm)
    }

    pub fn from_statm(statm: &str) -> Option<Self> {
        let mut fields = statm.split_whitespace();
        let size: u64 = fields.next()?.parse().ok()?;
        let resident: u64 = fields.next()?.parse().ok()?;
        Some(Self {
            rss: format_mb(resident * PAGE_SIZE),
            virtual_size: format_mb(size * PAGE_SIZE),
        })
    }
}

fn format_mb(bytes: u64) -> String {
    format!("{}MB", (bytes as f64 / 1024.0 / 1024.0).round() as u64)
}

/// Full `/health/detailed` body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: OverallStatus,
    pub timestamp: String,
    /// Seconds since process start.
    pub uptime: f64,
    pub host: String,
    pub services: BTreeMap<Source, ServiceHealth>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<MemorySnapshot>,
}

impl HealthReport {
    /// Assemble a report; the overall status is `ok` only if every service is.
    pub fn new(services: BTreeMap<Source, ServiceHealth>, uptime: Duration) -> Self {
        let status = if !services.is_empty() && services.values().all(ServiceHealth::is_ok) {
            OverallStatus::Ok
        } else {
            OverallStatus::Degraded
        };

        Self {
            status,
            timestamp: now_rfc3339(),
            uptime: uptime.as_secs_f64(),
            host: hostname(),
            services,
            memory: MemorySnapshot::current(),
        }
    }
}

/// Current UTC time with millisecond precision, e.g. `2024-05-01T12:00:00.000Z`.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Host identifier from the environment.
pub fn hostname() -> String {
    std::env::var("HOSTNAME")
        .ok()
        .filter(|h| !h.is_empty())
        .or_else(|| {
            std::fs::read_to_string("/etc/hostname")
                .ok()
                .map(|h| h.trim().to_string())
                .filter(|h| !h.is_empty())
        })
        .unwrap_or_else(|| "unknown".to_string())
}
