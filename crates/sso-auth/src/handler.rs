//! Success and failure handlers.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use sso_core::RouteConfig;
use sso_model::{CallbackRequest, SecurityPrincipal};

use crate::error::AuthenticationError;

/// Error code appended to the login page after a failed callback.
pub const FAILURE_CODE: &str = "authentication_failed";

/// Turns an issued principal into the callback response.
pub trait SuccessHandler: Send + Sync {
    /// Builds the response for a successful login.
    fn on_success(&self, request: &CallbackRequest, principal: SecurityPrincipal) -> Response;
}

/// Turns an authentication failure into the callback response.
///
/// Implementations must not leak the failing stage to the client.
pub trait FailureHandler: Send + Sync {
    /// Builds the response for a failed login.
    fn on_failure(&self, request: &CallbackRequest, error: &AuthenticationError) -> Response;
}

/// Redirects to the agent landing page.
#[derive(Debug, Clone)]
pub struct RedirectSuccessHandler {
    target: String,
}

impl RedirectSuccessHandler {
    /// Creates a handler redirecting to `target`.
    #[must_use]
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }

    /// Creates a handler redirecting to the configured success path.
    #[must_use]
    pub fn from_routes(routes: &RouteConfig) -> Self {
        Self::new(routes.success_path.clone())
    }
}

impl SuccessHandler for RedirectSuccessHandler {
    fn on_success(&self, _request: &CallbackRequest, principal: SecurityPrincipal) -> Response {
        tracing::debug!(
            username = %principal.username(),
            target = %self.target,
            "redirecting agent"
        );
        found(&self.target)
    }
}

/// Redirects back to the login page with a generic error code.
#[derive(Debug, Clone)]
pub struct RedirectFailureHandler {
    target: String,
}

impl RedirectFailureHandler {
    /// Creates a handler redirecting to `login_path` with the error code.
    #[must_use]
    pub fn new(login_path: &str) -> Self {
        let separator = if login_path.contains('?') { '&' } else { '?' };
        Self {
            target: format!("{login_path}{separator}error={FAILURE_CODE}"),
        }
    }

    /// Creates a handler redirecting to the configured login path.
    #[must_use]
    pub fn from_routes(routes: &RouteConfig) -> Self {
        Self::new(&routes.login_path)
    }

    /// Gets the redirect target.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }
}

impl FailureHandler for RedirectFailureHandler {
    fn on_failure(&self, _request: &CallbackRequest, _error: &AuthenticationError) -> Response {
        found(&self.target)
    }
}

fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}
