//! Shared request decoding and response building.

use crate::{errors::AppError, services::store_service::StoreError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::{Serialize, de::DeserializeOwned};

/// Decode a JSON request body regardless of the declared content type.
pub fn decode<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body)
        .map_err(|err| AppError::bad_request("Invalid request").with_cause(err))
}

/// Serialize `payload` with the given status.
pub fn respond_json<T: Serialize>(status: StatusCode, payload: T) -> Response {
    (status, Json(payload)).into_response()
}

/// 204 with an empty body.
pub fn no_content() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// Store failures no handler expects: deadline expiry or driver errors.
pub fn unexpected(err: StoreError) -> AppError {
    match err {
        StoreError::Timeout(_) => AppError::timeout().with_cause(err),
        other => AppError::internal().with_cause(other),
    }
}
