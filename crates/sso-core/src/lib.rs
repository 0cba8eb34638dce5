//! # sso-core
//!
//! Configuration, error handling and audit events shared by the agent
//! single sign-on crates.
//!
//! ## Modules
//!
//! - [`config`] - server, route and Keycloak client settings
//! - [`error`] - top-level error type
//! - [`event`] - structured audit events for login outcomes

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod error;
pub mod event;

pub use config::{AppConfig, KeycloakSettings, RouteConfig, ServerSettings, HEALTH_PATH};
pub use error::{Error, Result};
pub use event::{Event, EventOutcome, EventType};
