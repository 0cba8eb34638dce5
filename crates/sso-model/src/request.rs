//! Inbound identity provider callback.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Query parameters Keycloak appends to the redirect URI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackQuery {
    /// Authorization code.
    pub code: Option<String>,
    /// OAuth state parameter.
    pub state: Option<String>,
    /// Keycloak session state.
    pub session_state: Option<String>,
}

impl CallbackQuery {
    /// Parses a raw query string.
    ///
    /// A repeated parameter keeps its last value and unknown parameters
    /// are ignored.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut query = Self::default();
        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            let slot = match key.as_ref() {
                "code" => &mut query.code,
                "state" => &mut query.state,
                "session_state" => &mut query.session_state,
                _ => continue,
            };
            *slot = Some(value.into_owned());
        }
        query
    }
}

/// A callback request, built once per inbound call.
///
/// Absent and empty parameters are treated the same.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackRequest {
    code: Option<String>,
    state: Option<String>,
    session_state: Option<String>,
    path: String,
}

impl CallbackRequest {
    /// Creates a request for the given path with no parameters.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Creates a request from a path and its parsed query.
    #[must_use]
    pub fn from_query(path: impl Into<String>, query: CallbackQuery) -> Self {
        Self {
            code: query.code,
            state: query.state,
            session_state: query.session_state,
            path: path.into(),
        }
    }

    /// Sets the authorization code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Sets the OAuth state.
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Sets the Keycloak session state.
    #[must_use]
    pub fn with_session_state(mut self, session_state: impl Into<String>) -> Self {
        self.session_state = Some(session_state.into());
        self
    }

    /// Gets the authorization code, if present and non-empty.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        non_empty(self.code.as_deref())
    }

    /// Gets the OAuth state, if present and non-empty.
    #[must_use]
    pub fn state(&self) -> Option<&str> {
        non_empty(self.state.as_deref())
    }

    /// Gets the session state, if present and non-empty.
    #[must_use]
    pub fn session_state(&self) -> Option<&str> {
        non_empty(self.session_state.as_deref())
    }

    /// Gets the request path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
