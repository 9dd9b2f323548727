//! Translation of external-data failures into caller-facing errors.
//!
//! # Decision table (first match wins)
//! ```text
//! request problem (source / parameter)  → 400, fixed message
//! upstream carried an HTTP status       → same status, fixed message per status
//!                                          (or the status' reason phrase)
//! upstream deadline elapsed             → 504 "Timeout accessing the external service"
//! anything else                         → 500 "Internal server error", detail logged only
//! ```

use reqwest::StatusCode;
use serde::Serialize;

use crate::external::error::{ErrorKind, ExternalDataError};

pub const TIMEOUT_MESSAGE: &str = "Timeout accessing the external service";
pub const INTERNAL_MESSAGE: &str = "Internal server error";

/// An outward status and the message shown for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedError {
    pub status: StatusCode,
    pub message: String,
}

/// Response body for every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ClassifiedError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            error: self.message.clone(),
        }
    }
}

/// Fixed message for a status an upstream rejected the call with.
pub fn upstream_status_message(status: StatusCode) -> String {
    let fixed = match status {
        StatusCode::BAD_REQUEST => "Bad Request: Invalid input provided.",
        StatusCode::UNAUTHORIZED => "Unauthorized: API key missing or invalid.",
        StatusCode::FORBIDDEN => "Forbidden: You do not have access to this resource.",
        StatusCode::NOT_FOUND => "Not Found: No matching data found for your query.",
        StatusCode::TOO_MANY_REQUESTS => {
            "Too Many Requests: API rate limit exceeded. Try again later."
        }
        StatusCode::SERVICE_UNAVAILABLE => "Service Unavailable: External API is down.",
        other => other.canonical_reason().unwrap_or("External service error"),
    };
    fixed.to_string()
}

/// Classify a failure. Unexpected failures are logged here with full detail;
/// the returned message never carries it.
pub fn classify(err: &ExternalDataError) -> ClassifiedError {
    let classified = match err.kind() {
        ErrorKind::InvalidSource => ClassifiedError::new(
            StatusCode::BAD_REQUEST,
            "Bad Request: Invalid external data source specified.",
        ),
        ErrorKind::MissingRequiredParam => match err {
            ExternalDataError::MissingParam(name) => ClassifiedError::new(
                StatusCode::BAD_REQUEST,
                format!("Bad Request: Missing \"{}\" parameter.", name),
            ),
            ExternalDataError::InvalidParam { name, .. } => ClassifiedError::new(
                StatusCode::BAD_REQUEST,
                format!("Bad Request: Invalid \"{}\" parameter.", name),
            ),
            _ => ClassifiedError::new(
                StatusCode::BAD_REQUEST,
                "Bad Request: Invalid input provided.",
            ),
        },
        ErrorKind::UpstreamRejected(status) => {
            ClassifiedError::new(status, upstream_status_message(status))
        }
        ErrorKind::UpstreamTimeout => {
            ClassifiedError::new(StatusCode::GATEWAY_TIMEOUT, TIMEOUT_MESSAGE)
        }
        ErrorKind::UpstreamUnexpected => {
            tracing::error!(error = %err, detail = ?err, "Unexpected error fetching external data");
            return ClassifiedError::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE);
        }
    };

    tracing::warn!(
        error = %err,
        status = classified.status.as_u16(),
        "External data request failed"
    );
    classified
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::error::UpstreamError;
    use crate::external::types::Source;

    fn upstream(error: UpstreamError) -> ExternalDataError {
        ExternalDataError::upstream(Source::GraphQl, error)
    }

    fn status(code: StatusCode) -> ExternalDataError {
        upstream(UpstreamError::Status { status: code })
    }

    #[test]
    fn test_fixed_messages_keep_status() {
        let cases = [
            (StatusCode::BAD_REQUEST, "Bad Request: Invalid input provided."),
            (StatusCode::UNAUTHORIZED, "Unauthorized: API key missing or invalid."),
            (StatusCode::FORBIDDEN, "Forbidden: You do not have access to this resource."),
            (StatusCode::NOT_FOUND, "Not Found: No matching data found for your query."),
            (
                StatusCode::TOO_MANY_REQUESTS,
                "Too Many Requests: API rate limit exceeded. Try again later.",
            ),
            (StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable: External API is down."),
        ];

        for (code, message) in cases {
            assert_eq!(classify(&status(code)), ClassifiedError::new(code, message));
        }
    }

    #[test]
    fn test_other_statuses_pass_through_with_reason() {
        assert_eq!(
            classify(&status(StatusCode::BAD_GATEWAY)),
            ClassifiedError::new(StatusCode::BAD_GATEWAY, "Bad Gateway")
        );
        assert_eq!(
            classify(&status(StatusCode::IM_A_TEAPOT)),
            ClassifiedError::new(StatusCode::IM_A_TEAPOT, "I'm a teapot")
        );

        let unnamed = StatusCode::from_u16(599).unwrap();
        assert_eq!(
            classify(&status(unnamed)),
            ClassifiedError::new(unnamed, "External service error")
        );
    }

    #[test]
    fn test_empty_result_set_is_internal_error() {
        let classified = classify(&upstream(UpstreamError::NotFound("Pokemon not found".into())));
        assert_eq!(classified.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            classified.body(),
            ErrorBody {
                error: INTERNAL_MESSAGE.into()
            }
        );
    }

    #[test]
    fn test_timeout() {
        let classified = classify(&upstream(UpstreamError::Timeout { timeout_ms: 5000 }));
        assert_eq!(
            classified,
            ClassifiedError::new(StatusCode::GATEWAY_TIMEOUT, TIMEOUT_MESSAGE)
        );
    }

    #[test]
    fn test_unexpected_hides_detail() {
        for error in [
            UpstreamError::Decode("secret stack trace at line 42".into()),
            UpstreamError::Remote("SOAP fault: database password rejected".into()),
            UpstreamError::Endpoint("http://internal-host".into()),
        ] {
            let classified = classify(&upstream(error));
            assert_eq!(classified.status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(classified.message, INTERNAL_MESSAGE);
        }
    }

    #[test]
    fn test_request_problems() {
        assert_eq!(
            classify(&ExternalDataError::InvalidSource("ftp".into())),
            ClassifiedError::new(
                StatusCode::BAD_REQUEST,
                "Bad Request: Invalid external data source specified."
            )
        );
        assert_eq!(
            classify(&ExternalDataError::MissingParam("number")).message,
            "Bad Request: Missing \"number\" parameter."
        );
        assert_eq!(
            classify(&ExternalDataError::InvalidParam {
                name: "number",
                reason: "not an integer".into()
            })
            .message,
            "Bad Request: Invalid \"number\" parameter."
        );
    }
}
