//! # sso-oauth
//!
//! OAuth2 authorization-code client for Keycloak.
//!
//! - [`OAuthClient`] - the capability the login flow depends on
//! - [`KeycloakClient`] - `reqwest` implementation against Keycloak's
//!   OpenID Connect endpoints
//! - [`ProviderEndpoints`] - realm URLs and the authorization redirect
//! - [`ClientRegistry`] - lookup of configured clients by key
//!
//! ## Example
//!
//! ```ignore
//! use sso_oauth::{ClientRegistry, KEYCLOAK};
//!
//! let registry = ClientRegistry::from_settings(&config.keycloak)?;
//! let client = registry.client(KEYCLOAK)?;
//! let token = client.exchange_code_for_token(code).await?;
//! let identity = client.fetch_identity(&token).await?;
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod client;
pub mod endpoints;
pub mod error;
pub mod keycloak;
pub mod registry;

pub use client::{AccessToken, OAuthClient};
pub use endpoints::ProviderEndpoints;
pub use error::{OAuthError, OAuthResult};
pub use keycloak::KeycloakClient;
pub use registry::{ClientRegistry, KEYCLOAK};
