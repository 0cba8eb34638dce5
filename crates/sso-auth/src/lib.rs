//! # sso-auth
//!
//! Keycloak callback authentication for back-office agents.
//!
//! The [`KeycloakCallbackAuthenticator`] decides whether an inbound request
//! is a Keycloak callback, exchanges the authorization code, resolves the
//! remote identity to a local agent account (provisioning it on first
//! login) and issues a [`SecurityPrincipal`](sso_model::SecurityPrincipal).
//!
//! ## Example
//!
//! ```ignore
//! use sso_auth::{CallbackAuthenticator, KeycloakCallbackAuthenticator};
//!
//! let authenticator = KeycloakCallbackAuthenticator::new(client, directory, routes);
//! let response = authenticator.handle(&request).await;
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod authenticator;
pub mod error;
pub mod flow;
pub mod handler;
pub mod provisioning;

#[cfg(test)]
mod testing;

pub use authenticator::{CallbackAuthenticator, KeycloakCallbackAuthenticator, AUTHENTICATOR_ID};
pub use error::{AuthResult, AuthStage, AuthenticationError};
pub use flow::{states, CallbackFlow};
pub use handler::{
    FailureHandler, RedirectFailureHandler, RedirectSuccessHandler, SuccessHandler, FAILURE_CODE,
};
pub use provisioning::{agent_profile, derive_password};
