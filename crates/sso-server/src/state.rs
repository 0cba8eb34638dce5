//! Application state management.

use std::sync::Arc;

use sso_auth::CallbackAuthenticator;
use sso_core::AppConfig;
use sso_oauth::ProviderEndpoints;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<AppConfig>,

    /// Authenticator run on the login-check route.
    pub authenticator: Arc<dyn CallbackAuthenticator>,

    /// Endpoints used to build the authorization redirect.
    pub provider: Arc<ProviderEndpoints>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        config: AppConfig,
        authenticator: Arc<dyn CallbackAuthenticator>,
        provider: ProviderEndpoints,
    ) -> Self {
        Self {
            config: Arc::new(config),
            authenticator,
            provider: Arc::new(provider),
        }
    }
}
