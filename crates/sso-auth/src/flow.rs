//! Callback flow state machine.
//!
//! Each step consumes the flow and returns it in the next state, so a
//! principal can only be issued after the code was exchanged, the identity
//! fetched and the user resolved, in that order.

use sso_directory::UserDirectory;
use sso_model::{SecurityPrincipal, User};
use sso_oauth::OAuthClient;
use uuid::Uuid;

use crate::error::{AuthResult, AuthenticationError};
use crate::provisioning::agent_profile;

/// Callback flow states.
pub mod states {
    use sso_model::{RemoteIdentity, User};
    use sso_oauth::AccessToken;

    /// The authorization code was taken from the callback.
    #[derive(Debug)]
    pub struct CredentialsExtracted {
        pub(crate) code: String,
    }

    /// The code was exchanged for a token.
    #[derive(Debug)]
    pub struct TokenExchanged {
        pub(crate) token: AccessToken,
    }

    /// The token owner's profile was fetched.
    #[derive(Debug)]
    pub struct IdentityFetched {
        pub(crate) identity: RemoteIdentity,
    }

    /// A local account was found or provisioned.
    #[derive(Debug)]
    pub struct UserResolved {
        pub(crate) user: User,
        pub(crate) provisioned: bool,
    }
}

/// One callback on its way to a principal.
///
/// The generic parameter `S` is the current state.
#[derive(Debug)]
pub struct CallbackFlow<S> {
    flow_id: Uuid,
    state: S,
}

impl<S> CallbackFlow<S> {
    /// Gets the flow ID used to correlate log lines.
    #[must_use]
    pub const fn flow_id(&self) -> Uuid {
        self.flow_id
    }

    fn advance<T>(self, state: T) -> CallbackFlow<T> {
        CallbackFlow {
            flow_id: self.flow_id,
            state,
        }
    }
}

impl CallbackFlow<states::CredentialsExtracted> {
    /// Starts a flow for an extracted authorization code.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            flow_id: Uuid::now_v7(),
            state: states::CredentialsExtracted { code: code.into() },
        }
    }

    /// Exchanges the code for a token.
    ///
    /// # Errors
    ///
    /// Returns `TokenExchangeFailed` if the client rejects the exchange.
    pub async fn exchange(
        self,
        client: &dyn OAuthClient,
    ) -> AuthResult<CallbackFlow<states::TokenExchanged>> {
        let token = client
            .exchange_code_for_token(&self.state.code)
            .await
            .map_err(AuthenticationError::TokenExchangeFailed)?;

        tracing::debug!(flow_id = %self.flow_id, "token exchanged");
        Ok(self.advance(states::TokenExchanged { token }))
    }
}

impl CallbackFlow<states::TokenExchanged> {
    /// Fetches the profile of the token's owner.
    ///
    /// # Errors
    ///
    /// Returns `IdentityFetchFailed` if the client cannot fetch it.
    pub async fn fetch_identity(
        self,
        client: &dyn OAuthClient,
    ) -> AuthResult<CallbackFlow<states::IdentityFetched>> {
        let identity = client
            .fetch_identity(&self.state.token)
            .await
            .map_err(AuthenticationError::IdentityFetchFailed)?;

        tracing::debug!(
            flow_id = %self.flow_id,
            subject = ?identity.subject(),
            "identity fetched"
        );
        Ok(self.advance(states::IdentityFetched { identity }))
    }
}

impl CallbackFlow<states::IdentityFetched> {
    /// Gets the email of the remote identity, possibly empty.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.state.identity.email
    }

    /// Resolves the identity to a local account, creating an agent on
    /// first login.
    ///
    /// # Errors
    ///
    /// - `MissingRemoteEmail` if the email is empty; the directory is not
    ///   consulted
    /// - `UserLookupFailed` if the lookup fails
    /// - `UserProvisioningFailed` if creation fails, including a lost race
    ///   against a concurrent first login
    pub async fn resolve_user(
        self,
        directory: &dyn UserDirectory,
    ) -> AuthResult<CallbackFlow<states::UserResolved>> {
        let identity = &self.state.identity;
        if !identity.has_email() {
            return Err(AuthenticationError::MissingRemoteEmail);
        }

        let existing = directory
            .find_by_email(&identity.email)
            .await
            .map_err(AuthenticationError::UserLookupFailed)?;

        let resolved = match existing {
            Some(user) => states::UserResolved {
                user,
                provisioned: false,
            },
            None => {
                let user = directory
                    .create_user(&agent_profile(identity))
                    .await
                    .map_err(AuthenticationError::UserProvisioningFailed)?;

                tracing::info!(
                    flow_id = %self.flow_id,
                    user_id = %user.id,
                    username = %user.username,
                    "agent provisioned"
                );
                states::UserResolved {
                    user,
                    provisioned: true,
                }
            }
        };

        Ok(self.advance(resolved))
    }
}

impl CallbackFlow<states::UserResolved> {
    /// Checks whether the account was created by this flow.
    #[must_use]
    pub const fn was_provisioned(&self) -> bool {
        self.state.provisioned
    }

    /// Gets the resolved account.
    #[must_use]
    pub const fn user(&self) -> &User {
        &self.state.user
    }

    /// Issues the agent principal.
    #[must_use]
    pub fn issue_principal(self) -> SecurityPrincipal {
        SecurityPrincipal::agent(self.state.user)
    }
}
