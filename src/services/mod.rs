pub mod credential_service;
pub mod store_service;
