//! HTTP handlers, one per (resource, operation) pair.
//!
//! Each handler decodes its JSON body, performs one store round trip and
//! returns exactly one response. Failures come back as `AppError`, which
//! renders the client-facing envelope itself.

pub mod bucket_handlers;
pub mod health_handlers;
pub mod respond;
pub mod user_handlers;
