//! # sso-server
//!
//! Axum server for agent single sign-on.
//!
//! Exposes two routes taken from configuration:
//! - the login route, which redirects the browser to Keycloak
//! - the login-check route, which Keycloak redirects back to and which runs
//!   the callback authenticator
//!
//! plus `/health`.
//!
//! ## Usage
//!
//! ```ignore
//! use sso_core::AppConfig;
//! use sso_server::Server;
//!
//! let config = AppConfig::from_env()?;
//! let server = Server::new(config)?;
//! server.run().await?;
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use sso_auth::KeycloakCallbackAuthenticator;
use sso_core::AppConfig;
use sso_directory::InMemoryUserDirectory;
use sso_oauth::{ClientRegistry, KEYCLOAK};
use tokio::net::TcpListener;

/// The agent SSO server.
pub struct Server {
    config: AppConfig,
    directory: Arc<InMemoryUserDirectory>,
    state: AppState,
}

impl Server {
    /// Creates a new server instance.
    ///
    /// Builds the Keycloak client from the configuration and wires it into
    /// the authenticator together with an in-memory user directory.
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        config.routes.validate()?;

        let registry = ClientRegistry::from_settings(&config.keycloak)?;
        let provider = registry.provider(KEYCLOAK)?.clone();
        let directory = Arc::new(InMemoryUserDirectory::new());

        let authenticator = KeycloakCallbackAuthenticator::new(
            registry.client(KEYCLOAK)?,
            directory.clone(),
            config.routes.clone(),
        );

        tracing::info!(
            issuer = %provider.issuer(),
            client_id = %provider.client_id(),
            "Keycloak client configured"
        );

        let state = AppState::new(config.clone(), Arc::new(authenticator), provider);

        Ok(Self {
            config,
            directory,
            state,
        })
    }

    /// Runs the server.
    ///
    /// This starts the HTTP server and blocks until it receives a shutdown signal.
    pub async fn run(self) -> anyhow::Result<()> {
        let app = create_router(self.state);

        let addr: SocketAddr = format!("{}:{}", self.config.server.host, self.config.server.port)
            .parse()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on http://{}", listener.local_addr()?);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Returns the server configuration.
    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Returns the user directory backing the authenticator.
    #[must_use]
    pub fn directory(&self) -> Arc<InMemoryUserDirectory> {
        Arc::clone(&self.directory)
    }

    /// Creates a test router without starting the server.
    pub fn test_router(&self) -> Router {
        create_router(self.state.clone())
    }
}

/// Waits for a shutdown signal.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
