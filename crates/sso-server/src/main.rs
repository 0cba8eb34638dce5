//! # Agent SSO Server
//!
//! Main entry point for the agent single sign-on server.

#![forbid(unsafe_code)]

use sso_core::AppConfig;
use sso_server::Server;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "agent SSO starting");

    let config = AppConfig::from_env()?;
    Server::new(config)?.run().await
}
