//! OAuth client capability.

use std::fmt;

use async_trait::async_trait;
use serde::Deserialize;
use sso_model::RemoteIdentity;

use crate::error::OAuthResult;

/// Token returned by the authorization-code exchange.
///
/// Held only for the duration of one login; `Debug` never prints secrets.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct AccessToken {
    access_token: String,
    #[serde(default = "default_token_type")]
    token_type: String,
    #[serde(default)]
    expires_in: Option<u64>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    scope: Option<String>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl AccessToken {
    /// Creates a bearer token with no expiry information.
    #[must_use]
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: default_token_type(),
            expires_in: None,
            refresh_token: None,
            scope: None,
        }
    }

    /// Gets the raw access token.
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.access_token
    }

    /// Gets the token type (usually `Bearer`).
    #[must_use]
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// Gets the lifetime in seconds, if reported.
    #[must_use]
    pub const fn expires_in(&self) -> Option<u64> {
        self.expires_in
    }

    /// Gets the granted scope, if reported.
    #[must_use]
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Checks whether a refresh token came with the access token.
    #[must_use]
    pub const fn has_refresh_token(&self) -> bool {
        self.refresh_token.is_some()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"[redacted]")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[redacted]"))
            .field("scope", &self.scope)
            .finish()
    }
}

/// OAuth2 client used by the login flow.
///
/// Implementations enforce their own timeouts and never retry.
#[async_trait]
pub trait OAuthClient: Send + Sync {
    /// Gets the OAuth client ID registered at the provider.
    fn client_id(&self) -> &str;

    /// Exchanges an authorization code for a token
    /// (`grant_type=authorization_code`).
    async fn exchange_code_for_token(&self, code: &str) -> OAuthResult<AccessToken>;

    /// Fetches the profile of the token's owner.
    async fn fetch_identity(&self, token: &AccessToken) -> OAuthResult<RemoteIdentity>;
}
