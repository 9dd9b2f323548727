//! Error responses.
//!
//! Every failed request answers `{"error": "<message>"}` with the
//! classified status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::external::{classify, ClassifiedError, ExternalDataError};

impl IntoResponse for ClassifiedError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body())).into_response()
    }
}

impl IntoResponse for ExternalDataError {
    fn into_response(self) -> Response {
        classify(&self).into_response()
    }
}

/// 404 for unknown routes.
pub async fn not_found() -> ClassifiedError {
    ClassifiedError::new(StatusCode::NOT_FOUND, "Not Found")
}
