//! HTTP handlers for mock S3 buckets: create, delete and get.

use crate::{
    errors::AppError,
    handlers::respond::{decode, no_content, respond_json, unexpected},
    models::bucket::{Bucket, validate_bucket_name},
    services::store_service::StoreError,
    state::AppState,
};
use axum::{extract::State, http::StatusCode, response::Response};
use bytes::Bytes;
use serde::Deserialize;
use tracing::info;

/// Body of `POST /api/v1/s3/create`.
#[derive(Debug, Deserialize)]
pub struct CreateBucketParams {
    pub bucket: String,
    pub tags: String,
}

/// Body of `get` and `delete`.
#[derive(Debug, Deserialize)]
pub struct BucketNameParams {
    pub bucket: String,
}

/// POST `/api/v1/s3/create`
///
/// Stamps id, domain name and UTC creation time server-side. A name already
/// in use answers 409.
pub async fn create_bucket(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    const OP: &str = "create_bucket";
    let params: CreateBucketParams = decode(&body).map_err(|err| err.for_op(OP))?;
    validate_bucket_name(&params.bucket).map_err(|err| {
        AppError::bad_request(format!("Invalid bucket name: {}", err.reason))
            .with_cause(&err)
            .for_op(OP)
            .with_key(params.bucket.as_str())
    })?;

    let bucket = Bucket::new(params.bucket, params.tags);
    let created = state
        .store
        .create_bucket(&bucket)
        .await
        .map_err(|err| match err {
            err @ StoreError::DuplicateKey(_) => {
                AppError::conflict("Bucket already exists").with_cause(err)
            }
            other => unexpected(other),
        })
        .map_err(|err| err.for_op(OP).with_key(bucket.bucket.as_str()))?;

    info!(
        operation = OP,
        bucket = %created.bucket,
        id = %created.id,
        "S3 bucket created"
    );
    Ok(respond_json(StatusCode::CREATED, created))
}

/// DELETE `/api/v1/s3/delete`
pub async fn delete_bucket(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    const OP: &str = "delete_bucket";
    let params: BucketNameParams = decode(&body).map_err(|err| err.for_op(OP))?;

    state
        .store
        .delete_bucket(&params.bucket)
        .await
        .map_err(|err| match err {
            err @ StoreError::NotFound(_) => {
                AppError::not_found("Bucket not found").with_cause(err)
            }
            other => unexpected(other),
        })
        .map_err(|err| err.for_op(OP).with_key(params.bucket.as_str()))?;

    info!(operation = OP, bucket = %params.bucket, "S3 bucket deleted");
    Ok(no_content())
}

/// GET `/api/v1/s3/get`
pub async fn get_bucket(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    const OP: &str = "get_bucket";
    let params: BucketNameParams = decode(&body).map_err(|err| err.for_op(OP))?;

    let bucket = state
        .store
        .get_bucket(&params.bucket)
        .await
        .map_err(|err| match err {
            err @ StoreError::NotFound(_) => {
                AppError::not_found("Bucket not found").with_cause(err)
            }
            other => unexpected(other),
        })
        .map_err(|err| err.for_op(OP).with_key(params.bucket.as_str()))?;

    info!(operation = OP, bucket = %bucket.bucket, "S3 bucket retrieved");
    Ok(respond_json(StatusCode::OK, bucket))
}
