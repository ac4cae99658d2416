//! Liveness handler.

use axum::{http::StatusCode, response::IntoResponse};

/// `GET /api/v1/health`
///
/// Always 200 with a literal `OK`. Never touches the store.
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
