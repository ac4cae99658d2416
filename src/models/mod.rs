//! Core data models for the control-plane emulator.
//!
//! These entities map to database rows via `sqlx::FromRow`. Only the
//! projections meant for clients derive `Serialize`.

pub mod bucket;
pub mod user;
