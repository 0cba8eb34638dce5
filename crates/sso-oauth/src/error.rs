//! OAuth client error types.

use thiserror::Error;

/// Errors raised while talking to the identity provider.
#[derive(Debug, Error)]
pub enum OAuthError {
    /// Transport failure, including timeouts.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("provider returned {status}: {error}")]
    Provider {
        /// HTTP status code.
        status: u16,
        /// OAuth error code (e.g. `invalid_grant`).
        error: String,
        /// Optional human-readable description.
        description: Option<String>,
    },

    /// The provider answered with a body we could not use.
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    /// Malformed endpoint configuration.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// No client registered under the requested key.
    #[error("unknown OAuth client: {0}")]
    UnknownClient(String),
}

impl OAuthError {
    /// Checks if the request timed out.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_timeout())
    }

    /// Gets the OAuth error code returned by the provider, if any.
    #[must_use]
    pub fn provider_error(&self) -> Option<&str> {
        match self {
            Self::Provider { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Result type for OAuth operations.
pub type OAuthResult<T> = Result<T, OAuthError>;
