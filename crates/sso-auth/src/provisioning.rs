//! Mapping of a remote identity onto a new agent account.

use sso_model::{RemoteIdentity, UserProfile, UserStatus};
use uuid::Uuid;

/// Derives the local password of a provisioned agent from its email.
///
/// UUID v5 in the OID namespace over the email bytes. Agents never log in
/// with this password; it only satisfies the directory's non-empty
/// password requirement and stays stable across re-provisioning.
#[must_use]
pub fn derive_password(email: &str) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, email.as_bytes()).to_string()
}

/// Builds the profile used to create an agent on first login.
///
/// The locale is left unset so the directory applies its default.
#[must_use]
pub fn agent_profile(identity: &RemoteIdentity) -> UserProfile {
    UserProfile::new(identity.email.clone())
        .with_first_name(identity.given_name.clone())
        .with_last_name(identity.family_name.clone())
        .with_password(derive_password(&identity.email))
        .with_status(UserStatus::Active)
        .with_agent(true)
}
