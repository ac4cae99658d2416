//! Uniform failure observation for resource handlers.
//!
//! Handlers own the response; this layer only logs the failure a handler
//! attached to it. Status and body pass through untouched.

use crate::errors::{AppError, ErrorKind};
use axum::{
    extract::{OriginalUri, Request},
    middleware::Next,
    response::Response,
};
use tracing::{error, warn};

/// Log the `AppError` carried by a handler's response, if any.
///
/// The logged path is the one the client sent, not the remainder seen
/// inside a nested router.
pub async fn observe_failures(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = match request.extensions().get::<OriginalUri>() {
        Some(OriginalUri(uri)) => uri.path().to_owned(),
        None => request.uri().path().to_owned(),
    };

    let response = next.run(request).await;

    if let Some(failure) = response.extensions().get::<AppError>() {
        let status = response.status().as_u16();
        let operation = failure.operation.unwrap_or("unknown");
        let key = failure.key.as_deref().unwrap_or("-");
        match failure.kind {
            ErrorKind::Internal | ErrorKind::Timeout => error!(
                %method,
                %path,
                status,
                operation = %operation,
                key = %key,
                error = %failure,
                "request failed"
            ),
            _ => warn!(
                %method,
                %path,
                status,
                operation = %operation,
                key = %key,
                error = %failure,
                "request rejected"
            ),
        }
    }

    response
}
