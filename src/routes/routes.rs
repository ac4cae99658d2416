//! Defines routes for the user and bucket control-plane operations.
//!
//! ## Structure
//! - `GET    /api/v1/health`: liveness, never touches the store
//!
//! - **Bucket endpoints** (`/api/v1/s3`)
//!   - `POST   /create`: create bucket
//!   - `DELETE /delete`: delete bucket
//!   - `GET    /get`: fetch bucket record
//!
//! - **User endpoints** (`/api/v1/users`)
//!   - `POST   /create`: create user
//!   - `DELETE /delete`: delete user
//!   - `GET    /get`: fetch user
//!   - `POST   /login`: verify name and password
//!
//! Every operation takes its key in the JSON body; there are no path parameters.

use crate::{
    handlers::{
        bucket_handlers::{create_bucket, delete_bucket, get_bucket},
        health_handlers::health,
        user_handlers::{create_user, delete_user, get_user, login},
    },
    routes::dispatch::observe_failures,
    state::AppState,
};
use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

/// Build the router for all endpoints, still awaiting its state.
///
/// Resource routes are wrapped by [`observe_failures`]; the health check is not.
pub fn routes() -> Router<AppState> {
    let s3 = Router::new()
        .route("/create", post(create_bucket))
        .route("/delete", delete(delete_bucket))
        .route("/get", get(get_bucket))
        .route_layer(middleware::from_fn(observe_failures));

    let users = Router::new()
        .route("/create", post(create_user))
        .route("/delete", delete(delete_user))
        .route("/get", get(get_user))
        .route("/login", post(login))
        .route_layer(middleware::from_fn(observe_failures));

    Router::new()
        .route("/api/v1/health", get(health))
        .nest("/api/v1/s3", s3)
        .nest("/api/v1/users", users)
}

/// Router with its dependencies injected, ready to serve.
pub fn build_router(state: AppState) -> Router {
    routes().with_state(state)
}
