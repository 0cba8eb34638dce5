//! Authentication error types.

use std::fmt;

use sso_core::event::EventType;
use sso_directory::DirectoryError;
use sso_oauth::OAuthError;
use thiserror::Error;

/// Stage of the callback flow at which authentication failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthStage {
    /// Authorization code could not be exchanged.
    TokenExchange,
    /// Userinfo could not be fetched.
    IdentityFetch,
    /// Remote identity carried no email.
    MissingEmail,
    /// Directory lookup by email failed.
    UserLookup,
    /// Agent account could not be created.
    UserCreation,
}

impl AuthStage {
    /// Returns the stage name used in logs and audit events.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TokenExchange => "token_exchange",
            Self::IdentityFetch => "identity_fetch",
            Self::MissingEmail => "missing_email",
            Self::UserLookup => "user_lookup",
            Self::UserCreation => "user_creation",
        }
    }
}

impl fmt::Display for AuthStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal failure of one callback.
///
/// None of these are retried. The `Display` output is meant for logs; the
/// failure handler answers every variant with the same generic response.
#[derive(Debug, Error)]
pub enum AuthenticationError {
    /// Code-for-token exchange failed.
    #[error("token exchange failed: {0}")]
    TokenExchangeFailed(#[source] OAuthError),

    /// Fetching the remote identity failed.
    #[error("identity fetch failed: {0}")]
    IdentityFetchFailed(#[source] OAuthError),

    /// The remote identity has no email and cannot be mapped to an account.
    #[error("remote identity has no email")]
    MissingRemoteEmail,

    /// Looking up the account by email failed.
    #[error("user lookup failed: {0}")]
    UserLookupFailed(#[source] DirectoryError),

    /// Creating the agent account failed.
    #[error("user provisioning failed: {0}")]
    UserProvisioningFailed(#[source] DirectoryError),
}

impl AuthenticationError {
    /// Gets the failing stage.
    #[must_use]
    pub const fn stage(&self) -> AuthStage {
        match self {
            Self::TokenExchangeFailed(_) => AuthStage::TokenExchange,
            Self::IdentityFetchFailed(_) => AuthStage::IdentityFetch,
            Self::MissingRemoteEmail => AuthStage::MissingEmail,
            Self::UserLookupFailed(_) => AuthStage::UserLookup,
            Self::UserProvisioningFailed(_) => AuthStage::UserCreation,
        }
    }

    /// Audit event type recorded for this failure.
    #[must_use]
    pub const fn event_type(&self) -> EventType {
        match self {
            Self::TokenExchangeFailed(_) => EventType::CodeToTokenError,
            Self::UserProvisioningFailed(_) => EventType::RegisterError,
            _ => EventType::LoginError,
        }
    }
}

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthenticationError>;
