//! Mock cloud control plane: user accounts and S3-style bucket records
//! behind a small JSON HTTP API, persisted in SQLite.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use config::AppConfig;
pub use routes::routes::build_router;
pub use state::AppState;
