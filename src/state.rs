//! Shared state injected into every handler.

use crate::services::{credential_service::CredentialService, store_service::ResourceStore};

/// Dependencies of the resource handlers, passed explicitly as router state.
#[derive(Clone)]
pub struct AppState {
    pub store: ResourceStore,
    pub credentials: CredentialService,
}

impl AppState {
    pub fn new(store: ResourceStore, credentials: CredentialService) -> Self {
        Self { store, credentials }
    }
}
