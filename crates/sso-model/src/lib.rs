//! # sso-model
//!
//! Domain types for the agent login flow.
//!
//! - [`CallbackRequest`] - the inbound identity provider callback
//! - [`RemoteIdentity`] - the profile returned by the identity provider
//! - [`User`] / [`UserProfile`] - the local agent account and the values
//!   used to create one
//! - [`SecurityPrincipal`] - the authenticated result

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod identity;
pub mod principal;
pub mod request;
pub mod user;

pub use identity::RemoteIdentity;
pub use principal::{AgentRole, SecurityPrincipal};
pub use request::{CallbackQuery, CallbackRequest};
pub use user::{User, UserProfile, UserStatus};
