//! Lookup of configured OAuth clients by key.

use std::collections::HashMap;
use std::sync::Arc;

use sso_core::KeycloakSettings;

use crate::client::OAuthClient;
use crate::endpoints::ProviderEndpoints;
use crate::error::{OAuthError, OAuthResult};
use crate::keycloak::KeycloakClient;

/// Registry key of the Keycloak client.
pub const KEYCLOAK: &str = "keycloak";

struct Registration {
    client: Arc<dyn OAuthClient>,
    provider: ProviderEndpoints,
}

/// Configured OAuth clients and their provider endpoints, keyed by name.
#[derive(Default)]
pub struct ClientRegistry {
    entries: HashMap<String, Registration>,
}

impl ClientRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding a [`KeycloakClient`] under [`KEYCLOAK`].
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be built from the settings.
    pub fn from_settings(settings: &KeycloakSettings) -> OAuthResult<Self> {
        let client = KeycloakClient::new(settings)?;
        let provider = client.endpoints().clone();
        Ok(Self::new().register(KEYCLOAK, Arc::new(client), provider))
    }

    /// Registers a client under `key`, replacing any previous registration.
    #[must_use]
    pub fn register(
        mut self,
        key: impl Into<String>,
        client: Arc<dyn OAuthClient>,
        provider: ProviderEndpoints,
    ) -> Self {
        self.entries
            .insert(key.into(), Registration { client, provider });
        self
    }

    /// Gets the client registered under `key`.
    ///
    /// # Errors
    ///
    /// Returns `OAuthError::UnknownClient` if nothing is registered under `key`.
    pub fn client(&self, key: &str) -> OAuthResult<Arc<dyn OAuthClient>> {
        self.entries
            .get(key)
            .map(|entry| Arc::clone(&entry.client))
            .ok_or_else(|| OAuthError::UnknownClient(key.to_string()))
    }

    /// Gets the provider endpoints registered under `key`.
    ///
    /// # Errors
    ///
    /// Returns `OAuthError::UnknownClient` if nothing is registered under `key`.
    pub fn provider(&self, key: &str) -> OAuthResult<&ProviderEndpoints> {
        self.entries
            .get(key)
            .map(|entry| &entry.provider)
            .ok_or_else(|| OAuthError::UnknownClient(key.to_string()))
    }
}
