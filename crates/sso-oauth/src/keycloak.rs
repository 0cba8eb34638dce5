//! Keycloak implementation of [`OAuthClient`].

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use sso_core::KeycloakSettings;
use sso_model::RemoteIdentity;

use crate::client::{AccessToken, OAuthClient};
use crate::endpoints::ProviderEndpoints;
use crate::error::{OAuthError, OAuthResult};

/// OAuth2 client talking to a Keycloak realm over HTTP.
///
/// Every request is bounded by the configured timeout.
pub struct KeycloakClient {
    http: reqwest::Client,
    endpoints: ProviderEndpoints,
    client_secret: String,
}

/// OAuth 2.0 error body (RFC 6749 section 5.2).
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    error_description: Option<String>,
}

impl KeycloakClient {
    /// Creates a client from Keycloak settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client
    /// cannot be built.
    pub fn new(settings: &KeycloakSettings) -> OAuthResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(settings.http_timeout())
            .build()?;

        Ok(Self {
            http,
            endpoints: ProviderEndpoints::from_settings(settings)?,
            client_secret: settings.client_secret.clone(),
        })
    }

    /// Gets the realm endpoints this client talks to.
    #[must_use]
    pub const fn endpoints(&self) -> &ProviderEndpoints {
        &self.endpoints
    }
}

#[async_trait]
impl OAuthClient for KeycloakClient {
    fn client_id(&self) -> &str {
        self.endpoints.client_id()
    }

    async fn exchange_code_for_token(&self, code: &str) -> OAuthResult<AccessToken> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.endpoints.redirect_uri()),
            ("client_id", self.endpoints.client_id()),
            ("client_secret", self.client_secret.as_str()),
        ];

        let response = self
            .http
            .post(self.endpoints.token_endpoint()?)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&params)
            .send()
            .await?;

        let token: AccessToken = handle_response(response).await?;
        if token.secret().is_empty() {
            return Err(OAuthError::InvalidResponse(
                "token response without access_token".to_string(),
            ));
        }

        tracing::debug!(
            client_id = %self.client_id(),
            expires_in = ?token.expires_in(),
            "authorization code exchanged"
        );

        Ok(token)
    }

    async fn fetch_identity(&self, token: &AccessToken) -> OAuthResult<RemoteIdentity> {
        let response = self
            .http
            .get(self.endpoints.userinfo_endpoint()?)
            .header(reqwest::header::ACCEPT, "application/json")
            .bearer_auth(token.secret())
            .send()
            .await?;

        handle_response(response).await
    }
}

/// Decodes a success body or maps the provider's error body.
async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> OAuthResult<T> {
    let status = response.status();
    let body = response.bytes().await?;

    if status.is_success() {
        return serde_json::from_slice(&body)
            .map_err(|e| OAuthError::InvalidResponse(e.to_string()));
    }

    let (error, description) = match serde_json::from_slice::<ErrorBody>(&body) {
        Ok(parsed) => (parsed.error, parsed.error_description),
        Err(_) => (
            status
                .canonical_reason()
                .unwrap_or("unknown_error")
                .to_string(),
            None,
        ),
    };

    tracing::warn!(
        status = status.as_u16(),
        error = %error,
        description = ?description,
        "identity provider rejected request"
    );

    Err(OAuthError::Provider {
        status: status.as_u16(),
        error,
        description,
    })
}
