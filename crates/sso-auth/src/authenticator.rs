//! The agent Keycloak callback authenticator.

use std::sync::Arc;

use async_trait::async_trait;
use axum::response::{IntoResponse, Redirect, Response};
use sso_core::event::{Event, EventBuilder, EventType};
use sso_core::RouteConfig;
use sso_directory::UserDirectory;
use sso_model::{CallbackRequest, SecurityPrincipal};
use sso_oauth::OAuthClient;

use crate::error::{AuthResult, AuthenticationError};
use crate::flow::CallbackFlow;
use crate::handler::{
    FailureHandler, RedirectFailureHandler, RedirectSuccessHandler, SuccessHandler,
};

/// Stable identifier of [`KeycloakCallbackAuthenticator`].
pub const AUTHENTICATOR_ID: &str = "AGENT_KEYCLOAK_AUTHENTICATOR";

/// An authenticator driven by an OAuth callback.
///
/// [`handle`](CallbackAuthenticator::handle) runs the whole cycle; the
/// other methods are its steps and can be called on their own.
#[async_trait]
pub trait CallbackAuthenticator: Send + Sync {
    /// Gets the authenticator's identifier.
    fn id(&self) -> &'static str;

    /// Checks whether the request is a callback this authenticator handles.
    fn supports(&self, request: &CallbackRequest) -> bool;

    /// Extracts the authorization code.
    fn extract_credentials<'a>(&self, request: &'a CallbackRequest) -> Option<&'a str> {
        request.code()
    }

    /// Turns an authorization code into a principal.
    async fn authenticate(&self, code: &str) -> AuthResult<SecurityPrincipal>;

    /// Builds the response after a successful login.
    fn on_success(&self, request: &CallbackRequest, principal: SecurityPrincipal) -> Response;

    /// Builds the response after a failed login.
    fn on_failure(&self, request: &CallbackRequest, error: AuthenticationError) -> Response;

    /// Sends the client to the login page.
    fn start(&self, request: &CallbackRequest) -> Response;

    /// Runs one callback end to end.
    async fn handle(&self, request: &CallbackRequest) -> Response {
        if !self.supports(request) {
            return self.start(request);
        }
        let Some(code) = self.extract_credentials(request) else {
            return self.start(request);
        };

        match self.authenticate(code).await {
            Ok(principal) => self.on_success(request, principal),
            Err(error) => self.on_failure(request, error),
        }
    }
}

/// Authenticates back-office agents against Keycloak.
///
/// Holds only shared, immutable collaborators; one instance serves all
/// requests.
pub struct KeycloakCallbackAuthenticator {
    client: Arc<dyn OAuthClient>,
    directory: Arc<dyn UserDirectory>,
    routes: RouteConfig,
    success: Arc<dyn SuccessHandler>,
    failure: Arc<dyn FailureHandler>,
}

impl KeycloakCallbackAuthenticator {
    /// Creates an authenticator with redirect handlers built from `routes`.
    #[must_use]
    pub fn new(
        client: Arc<dyn OAuthClient>,
        directory: Arc<dyn UserDirectory>,
        routes: RouteConfig,
    ) -> Self {
        let success = Arc::new(RedirectSuccessHandler::from_routes(&routes));
        let failure = Arc::new(RedirectFailureHandler::from_routes(&routes));
        Self::with_handlers(client, directory, routes, success, failure)
    }

    /// Creates an authenticator delegating responses to the given handlers.
    #[must_use]
    pub fn with_handlers(
        client: Arc<dyn OAuthClient>,
        directory: Arc<dyn UserDirectory>,
        routes: RouteConfig,
        success: Arc<dyn SuccessHandler>,
        failure: Arc<dyn FailureHandler>,
    ) -> Self {
        Self {
            client,
            directory,
            routes,
            success,
            failure,
        }
    }

    fn audit(&self, event_type: EventType) -> EventBuilder {
        Event::builder(event_type)
            .client(self.client.client_id())
            .detail("authenticator", AUTHENTICATOR_ID)
    }

    async fn run_flow(&self, code: &str) -> AuthResult<SecurityPrincipal> {
        let flow = CallbackFlow::new(code).exchange(self.client.as_ref()).await?;
        self.audit(EventType::CodeToToken)
            .detail("flow_id", flow.flow_id().to_string())
            .build()
            .emit();

        let flow = flow
            .fetch_identity(self.client.as_ref())
            .await?
            .resolve_user(self.directory.as_ref())
            .await?;

        if flow.was_provisioned() {
            self.audit(EventType::Register)
                .user(flow.user().id)
                .username(flow.user().username.clone())
                .build()
                .emit();
        }

        Ok(flow.issue_principal())
    }
}

#[async_trait]
impl CallbackAuthenticator for KeycloakCallbackAuthenticator {
    fn id(&self) -> &'static str {
        AUTHENTICATOR_ID
    }

    fn supports(&self, request: &CallbackRequest) -> bool {
        request.code().is_some()
            && request.state().is_some()
            && request.session_state().is_some()
            && request.path().contains(&self.routes.login_check_segment)
    }

    async fn authenticate(&self, code: &str) -> AuthResult<SecurityPrincipal> {
        match self.run_flow(code).await {
            Ok(principal) => {
                self.audit(EventType::Login)
                    .user(principal.user().id)
                    .username(principal.username())
                    .detail("roles", principal.role_names().join(" "))
                    .build()
                    .emit();
                Ok(principal)
            }
            Err(error) => {
                tracing::warn!(
                    stage = %error.stage(),
                    error = %error,
                    "agent authentication failed"
                );
                self.audit(error.event_type())
                    .failure(error.stage().as_str())
                    .build()
                    .emit();
                Err(error)
            }
        }
    }

    fn on_success(&self, request: &CallbackRequest, principal: SecurityPrincipal) -> Response {
        self.success.on_success(request, principal)
    }

    fn on_failure(&self, request: &CallbackRequest, error: AuthenticationError) -> Response {
        self.failure.on_failure(request, &error)
    }

    fn start(&self, _request: &CallbackRequest) -> Response {
        Redirect::temporary(&self.routes.login_path).into_response()
    }
}
