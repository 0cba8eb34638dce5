//! Router configuration.

use axum::extract::{Query, RawQuery, State};
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};
use sso_core::HEALTH_PATH;
use sso_model::{CallbackQuery, CallbackRequest};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::state::AppState;

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    let routes = &state.config.routes;

    Router::new()
        .route(&routes.login_path, get(login))
        .route(&routes.login_check_path, get(login_check))
        .route(HEALTH_PATH, get(health_check))
        .with_state(state.clone())
        .layer(TraceLayer::new_for_http())
}

/// Query of the login route.
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    /// Set by the failure handler after a rejected callback.
    pub error: Option<String>,
}

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Sends the browser to Keycloak, or reports a failed previous attempt.
///
/// A failed attempt is answered directly so a provider that keeps
/// rejecting the callback cannot cause a redirect loop.
async fn login(State(state): State<AppState>, Query(query): Query<LoginQuery>) -> Response {
    if let Some(error) = query.error {
        tracing::debug!(error = %error, "showing login failure");
        return (StatusCode::UNAUTHORIZED, "authentication failed").into_response();
    }

    let oauth_state = Uuid::new_v4().simple().to_string();
    match state.provider.authorization_url(&oauth_state) {
        Ok(url) => (StatusCode::FOUND, [(header::LOCATION, url.to_string())]).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to build authorization url");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Runs the callback authenticator.
///
/// The query is parsed leniently: a repeated parameter keeps its last value
/// instead of rejecting the request.
async fn login_check(
    State(state): State<AppState>,
    uri: Uri,
    RawQuery(raw): RawQuery,
) -> Response {
    let query = CallbackQuery::parse(raw.as_deref().unwrap_or_default());
    let request = CallbackRequest::from_query(uri.path(), query);
    state.authenticator.handle(&request).await
}

/// Basic health check.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}
