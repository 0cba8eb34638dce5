//! Keycloak realm endpoints.

use sso_core::KeycloakSettings;
use url::Url;

use crate::error::OAuthResult;

/// OpenID Connect endpoint URLs of one Keycloak realm, plus the values
/// needed to build an authorization redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEndpoints {
    realm_url: Url,
    client_id: String,
    redirect_uri: String,
    scopes: Vec<String>,
}

impl ProviderEndpoints {
    /// Builds the endpoints for a realm.
    ///
    /// # Errors
    ///
    /// Returns `OAuthError::Url` if the base URL is not a valid URL.
    pub fn new(
        base_url: &str,
        realm: &str,
        client_id: impl Into<String>,
        redirect_uri: impl Into<String>,
        scopes: Vec<String>,
    ) -> OAuthResult<Self> {
        // Trailing slash so that `join` appends instead of replacing the realm
        let realm_url = Url::parse(&format!(
            "{}/realms/{}/",
            base_url.trim_end_matches('/'),
            realm
        ))?;

        Ok(Self {
            realm_url,
            client_id: client_id.into(),
            redirect_uri: redirect_uri.into(),
            scopes,
        })
    }

    /// Builds the endpoints from Keycloak settings.
    ///
    /// # Errors
    ///
    /// See [`ProviderEndpoints::new`].
    pub fn from_settings(settings: &KeycloakSettings) -> OAuthResult<Self> {
        Self::new(
            &settings.base_url,
            &settings.realm,
            settings.client_id.clone(),
            settings.redirect_uri.clone(),
            settings.scopes.clone(),
        )
    }

    /// Gets the realm (issuer) URL.
    #[must_use]
    pub fn issuer(&self) -> &str {
        self.realm_url.as_str().trim_end_matches('/')
    }

    /// Gets the client ID.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Gets the redirect URI.
    #[must_use]
    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// Authorization endpoint.
    ///
    /// # Errors
    ///
    /// Returns `OAuthError::Url` if the path cannot be joined.
    pub fn authorization_endpoint(&self) -> OAuthResult<Url> {
        self.protocol_url("auth")
    }

    /// Token endpoint.
    ///
    /// # Errors
    ///
    /// Returns `OAuthError::Url` if the path cannot be joined.
    pub fn token_endpoint(&self) -> OAuthResult<Url> {
        self.protocol_url("token")
    }

    /// Userinfo endpoint.
    ///
    /// # Errors
    ///
    /// Returns `OAuthError::Url` if the path cannot be joined.
    pub fn userinfo_endpoint(&self) -> OAuthResult<Url> {
        self.protocol_url("userinfo")
    }

    /// Builds the URL the login page redirects the browser to.
    ///
    /// # Errors
    ///
    /// Returns `OAuthError::Url` if the path cannot be joined.
    pub fn authorization_url(&self, state: &str) -> OAuthResult<Url> {
        let mut url = self.authorization_endpoint()?;
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("scope", &self.scopes.join(" "))
            .append_pair("state", state);
        Ok(url)
    }

    fn protocol_url(&self, endpoint: &str) -> OAuthResult<Url> {
        Ok(self
            .realm_url
            .join(&format!("protocol/openid-connect/{endpoint}"))?)
    }
}
