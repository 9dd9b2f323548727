//! `POST /unique-array`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::array::{dedup_sort, JsonNumber};
use crate::external::ClassifiedError;
use crate::http::schemas::ErrorSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UniqueArrayRequest {
    /// Numbers to sort and deduplicate; integers and floats may be mixed.
    #[schema(value_type = Vec<f64>, min_items = 1, example = json!([5, 1, 3, 2, 3, 1]))]
    pub array: Vec<JsonNumber>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UniqueArrayResponse {
    /// Distinct input values in ascending order.
    #[schema(value_type = Vec<f64>, example = json!([1, 2, 3, 5]))]
    pub unique_array: Vec<JsonNumber>,
}

impl UniqueArrayRequest {
    fn validate(self) -> Result<Vec<JsonNumber>, ClassifiedError> {
        if self.array.is_empty() {
            return Err(ClassifiedError::new(
                StatusCode::BAD_REQUEST,
                "Bad Request: \"array\" must contain at least 1 item.",
            ));
        }
        Ok(self.array)
    }
}

/// Body rejections become `{error}` responses. A wrong content type keeps
/// 415 and an oversized body keeps 413; every other rejection is a 400.
fn reject(rejection: JsonRejection) -> ClassifiedError {
    let status = match rejection.status() {
        s @ (StatusCode::UNSUPPORTED_MEDIA_TYPE | StatusCode::PAYLOAD_TOO_LARGE) => s,
        _ => StatusCode::BAD_REQUEST,
    };
    let reason = status.canonical_reason().unwrap_or("Bad Request");
    ClassifiedError::new(status, format!("{}: {}", reason, rejection.body_text()))
}

#[utoipa::path(
    post,
    path = "/unique-array",
    request_body = UniqueArrayRequest,
    responses(
        (status = 200, description = "Sorted distinct values", body = UniqueArrayResponse),
        (status = 400, description = "Not a non-empty array of numbers", body = ErrorSchema),
        (status = 413, description = "Body exceeds the size limit", body = ErrorSchema),
        (status = 415, description = "Body is not JSON", body = ErrorSchema)
    ),
    tags = ["unique-array"],
    operation_id = "uniqueArray"
)]
pub async fn unique_array(
    payload: Result<Json<UniqueArrayRequest>, JsonRejection>,
) -> Result<Json<UniqueArrayResponse>, ClassifiedError> {
    let Json(request) = payload.map_err(reject)?;
    let values = request.validate()?;

    Ok(Json(UniqueArrayResponse {
        unique_array: dedup_sort(&values),
    }))
}
