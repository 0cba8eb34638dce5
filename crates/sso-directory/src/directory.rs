//! User directory trait.

use async_trait::async_trait;
use sso_model::{User, UserProfile};

use crate::error::DirectoryResult;

/// Lookup and creation of local agent accounts.
///
/// Implementations must be thread-safe. Two first logins for the same email
/// may call [`UserDirectory::create_user`] concurrently; the implementation
/// must let exactly one of them succeed.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Finds the account whose username equals `email`.
    ///
    /// Returns `Ok(None)` when no such account exists.
    async fn find_by_email(&self, email: &str) -> DirectoryResult<Option<User>>;

    /// Creates an account from `profile`.
    ///
    /// ## Errors
    ///
    /// Returns `DirectoryError::Duplicate` if the username is taken.
    async fn create_user(&self, profile: &UserProfile) -> DirectoryResult<User>;
}
