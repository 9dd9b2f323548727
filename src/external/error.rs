//! Failure types raised by adapters and the dispatcher.
//!
//! Adapters raise [`UpstreamError`] unmodified; [`ExternalDataService`]
//! wraps it with the source it came from. Only the classifier turns these
//! into caller-facing responses.
//!
//! [`ExternalDataService`]: crate::external::ExternalDataService

use reqwest::StatusCode;
use thiserror::Error;

use crate::external::types::Source;

/// A failed upstream interaction.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Upstream answered with a non-2xx status.
    #[error("upstream responded with {status}")]
    Status { status: StatusCode },

    /// The call exceeded its deadline.
    #[error("upstream timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    /// Connection, TLS or protocol failure before a response arrived.
    #[error("upstream request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The upstream answered successfully but had no matching record. It
    /// carries no upstream status, so it is not a rejection.
    #[error("{0}")]
    NotFound(String),

    /// The upstream reported an application-level error (GraphQL `errors`,
    /// SOAP fault).
    #[error("upstream reported an error: {0}")]
    Remote(String),

    /// The upstream response could not be understood.
    #[error("malformed upstream response: {0}")]
    Decode(String),

    /// A configured endpoint cannot be turned into a request URL.
    #[error("invalid upstream endpoint: {0}")]
    Endpoint(String),
}

impl UpstreamError {
    /// Map a `reqwest` failure, keeping the timeout marker and status.
    pub fn from_reqwest(err: reqwest::Error, timeout_ms: u64) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout { timeout_ms }
        } else if let Some(status) = err.status() {
            UpstreamError::Status { status }
        } else if err.is_decode() {
            UpstreamError::Decode(err.to_string())
        } else {
            UpstreamError::Transport(err)
        }
    }

    /// Fail on non-2xx responses.
    pub fn check_status(response: &reqwest::Response) -> Result<(), Self> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(UpstreamError::Status { status })
        }
    }
}

/// Failure of an external-data request.
#[derive(Debug, Error)]
pub enum ExternalDataError {
    #[error("Invalid external data source specified: '{0}'")]
    InvalidSource(String),

    #[error("missing \"{0}\" parameter")]
    MissingParam(&'static str),

    #[error("invalid \"{name}\" parameter: {reason}")]
    InvalidParam { name: &'static str, reason: String },

    #[error("{origin} upstream failed: {error}")]
    Upstream {
        origin: Source,
        #[source]
        error: UpstreamError,
    },
}

impl ExternalDataError {
    pub fn upstream(origin: Source, error: UpstreamError) -> Self {
        ExternalDataError::Upstream { origin, error }
    }

    /// Coarse category of this failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExternalDataError::InvalidSource(_) => ErrorKind::InvalidSource,
            ExternalDataError::MissingParam(_) | ExternalDataError::InvalidParam { .. } => {
                ErrorKind::MissingRequiredParam
            }
            ExternalDataError::Upstream { error, .. } => match error {
                UpstreamError::Status { status } => ErrorKind::UpstreamRejected(*status),
                UpstreamError::Timeout { .. } => ErrorKind::UpstreamTimeout,
                UpstreamError::NotFound(_)
                | UpstreamError::Transport(_)
                | UpstreamError::Remote(_)
                | UpstreamError::Decode(_)
                | UpstreamError::Endpoint(_) => ErrorKind::UpstreamUnexpected,
            },
        }
    }
}

/// The fixed failure taxonomy requests are classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidSource,
    MissingRequiredParam,
    UpstreamRejected(StatusCode),
    UpstreamTimeout,
    UpstreamUnexpected,
}
