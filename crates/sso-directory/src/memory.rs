//! In-memory user directory.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use sso_model::{User, UserProfile};

use crate::directory::UserDirectory;
use crate::error::{DirectoryError, DirectoryResult};
use crate::password::PasswordHasherService;

/// Locale assigned when a profile does not carry one.
pub const DEFAULT_LOCALE: &str = "en_US";

/// A process-local directory keyed by case-insensitive username.
///
/// Uniqueness is checked under the write lock, so concurrent creations for
/// the same username yield one account and one `Duplicate` error.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<String, User>>,
    hasher: PasswordHasherService,
}

impl InMemoryUserDirectory {
    /// Creates an empty directory with the default password policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty directory with a custom hasher.
    #[must_use]
    pub fn with_hasher(hasher: PasswordHasherService) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            hasher,
        }
    }

    /// Inserts an existing account, replacing any account with the same username.
    pub fn insert(&self, user: User) {
        self.users.write().insert(key(&user.username), user);
    }

    /// Returns the number of stored accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    /// Checks whether the directory is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }

    /// Gets the password hasher, e.g. to verify stored hashes.
    #[must_use]
    pub const fn hasher(&self) -> &PasswordHasherService {
        &self.hasher
    }
}

fn key(username: &str) -> String {
    username.trim().to_lowercase()
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_email(&self, email: &str) -> DirectoryResult<Option<User>> {
        Ok(self.users.read().get(&key(email)).cloned())
    }

    async fn create_user(&self, profile: &UserProfile) -> DirectoryResult<User> {
        let username_key = key(&profile.username);
        if username_key.is_empty() {
            return Err(DirectoryError::InvalidData(
                "username cannot be empty".to_string(),
            ));
        }

        let password_hash = self.hasher.hash(&profile.password)?;
        let mut user = User::from_profile(profile, password_hash);
        user.locale.get_or_insert_with(|| DEFAULT_LOCALE.to_string());

        let mut users = self.users.write();
        if users.contains_key(&username_key) {
            return Err(DirectoryError::duplicate("username", &profile.username));
        }
        users.insert(username_key, user.clone());
        drop(users);

        tracing::debug!(user_id = %user.id, username = %user.username, "user created");

        Ok(user)
    }
}
