//! Common test utilities and fixtures.

use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{redirect, Client};
use serde_json::json;
use sso_core::AppConfig;
use sso_directory::InMemoryUserDirectory;
use sso_server::Server;
use tokio::sync::oneshot;
use tokio::time::sleep;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN_PATH: &str = "/realms/agents/protocol/openid-connect/token";
const USERINFO_PATH: &str = "/realms/agents/protocol/openid-connect/userinfo";

/// Test environment with a mocked Keycloak and a running server.
pub struct TestEnv {
    /// Mocked Keycloak realm.
    pub keycloak: MockServer,
    /// Directory backing the running server.
    pub directory: Arc<InMemoryUserDirectory>,
    /// Base URL of the running server.
    pub base_url: String,
    /// HTTP client that does not follow redirects.
    pub client: Client,
    /// Server shutdown signal.
    _shutdown_tx: oneshot::Sender<()>,
}

impl TestEnv {
    /// Starts a mocked Keycloak and a server pointed at it.
    pub async fn new() -> anyhow::Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("sso_server=debug,sso_auth=debug")
            .try_init();

        let keycloak = MockServer::start().await;

        // Find available port for server
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let server_port = listener.local_addr()?.port();
        drop(listener);

        let base_url = format!("http://127.0.0.1:{server_port}");

        let mut config = AppConfig::for_testing(&keycloak.uri());
        config.server.port = server_port;
        config.server.base_url = base_url.clone();
        config.keycloak.redirect_uri = format!("{base_url}{}", config.routes.login_check_path);

        let (_shutdown_tx, shutdown_rx) = oneshot::channel();

        let server = Server::new(config)?;
        let directory = server.directory();
        tokio::spawn(async move {
            tokio::select! {
                result = server.run() => {
                    if let Err(e) = result {
                        tracing::error!("Server error: {}", e);
                    }
                }
                _ = shutdown_rx => {
                    tracing::info!("Server shutdown requested");
                }
            }
        });

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .redirect(redirect::Policy::none())
            .build()?;

        wait_for_server(&client, &base_url).await?;

        Ok(Self {
            keycloak,
            directory,
            base_url,
            client,
            _shutdown_tx,
        })
    }

    /// Mounts a token endpoint that accepts any code and a userinfo
    /// endpoint returning `userinfo`.
    pub async fn mount_keycloak(&self, userinfo: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path(TOKEN_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "integration-token",
                "token_type": "Bearer",
                "expires_in": 300
            })))
            .mount(&self.keycloak)
            .await;

        Mock::given(method("GET"))
            .and(path(USERINFO_PATH))
            .and(header("authorization", "Bearer integration-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(userinfo))
            .mount(&self.keycloak)
            .await;
    }

    /// Mounts a token endpoint that rejects every code.
    pub async fn mount_rejecting_token_endpoint(&self) {
        Mock::given(method("POST"))
            .and(path(TOKEN_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "invalid_grant",
                "error_description": "Code not valid"
            })))
            .mount(&self.keycloak)
            .await;
    }

    /// Returns a full URL for `path` on the server.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Returns a complete login-check callback URL.
    pub fn callback_url(&self, code: &str) -> String {
        self.url(&format!(
            "/agent/login_check?code={code}&state=st-1&session_state=ss-1"
        ))
    }

    /// Sends a GET and returns the status and `Location` header.
    pub async fn get(&self, url: &str) -> anyhow::Result<(u16, Option<String>)> {
        let response = self.client.get(url).send().await?;
        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .map(|v| v.to_str())
            .transpose()?
            .map(String::from);
        Ok((response.status().as_u16(), location))
    }

    /// Number of requests the mocked Keycloak received.
    pub async fn keycloak_requests(&self) -> usize {
        self.keycloak
            .received_requests()
            .await
            .map_or(0, |requests| requests.len())
    }

    /// Form bodies posted to the mocked token endpoint.
    pub async fn token_request_bodies(&self) -> Vec<String> {
        self.keycloak
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.url.path() == TOKEN_PATH)
            .map(|request| String::from_utf8_lossy(&request.body).into_owned())
            .collect()
    }
}

/// Waits for the server to become ready.
async fn wait_for_server(client: &Client, base_url: &str) -> anyhow::Result<()> {
    let health_url = format!("{base_url}/health");
    let max_attempts = 50;

    for attempt in 1..=max_attempts {
        match client.get(&health_url).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::info!("Server ready after {} attempts", attempt);
                return Ok(());
            }
            Ok(response) => {
                tracing::debug!(
                    "Server not ready (status {}), attempt {}/{}",
                    response.status(),
                    attempt,
                    max_attempts
                );
            }
            Err(e) => {
                tracing::debug!("Server not ready ({}), attempt {}/{}", e, attempt, max_attempts);
            }
        }
        sleep(Duration::from_millis(100)).await;
    }

    anyhow::bail!("Server did not become ready in time")
}
