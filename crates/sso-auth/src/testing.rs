//! Recording fakes of the collaborator traits.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use sso_directory::{DirectoryError, DirectoryResult, UserDirectory};
use sso_model::{RemoteIdentity, User, UserProfile};
use sso_oauth::{AccessToken, OAuthClient, OAuthError, OAuthResult};

pub struct FakeOAuthClient {
    identity: RemoteIdentity,
    fail_exchange: bool,
    fail_fetch: bool,
    exchanged: Mutex<Vec<String>>,
    fetches: AtomicUsize,
}

impl FakeOAuthClient {
    pub fn returning(identity: RemoteIdentity) -> Self {
        Self {
            identity,
            fail_exchange: false,
            fail_fetch: false,
            exchanged: Mutex::new(Vec::new()),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn failing_exchange() -> Self {
        Self {
            fail_exchange: true,
            ..Self::returning(RemoteIdentity::default())
        }
    }

    pub fn failing_fetch() -> Self {
        Self {
            fail_fetch: true,
            ..Self::returning(RemoteIdentity::default())
        }
    }

    pub fn exchanged_codes(&self) -> Vec<String> {
        self.exchanged.lock().clone()
    }

    pub fn exchange_calls(&self) -> usize {
        self.exchanged.lock().len()
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OAuthClient for FakeOAuthClient {
    fn client_id(&self) -> &str {
        "fake-client"
    }

    async fn exchange_code_for_token(&self, code: &str) -> OAuthResult<AccessToken> {
        self.exchanged.lock().push(code.to_string());
        if self.fail_exchange {
            return Err(OAuthError::Provider {
                status: 400,
                error: "invalid_grant".to_string(),
                description: None,
            });
        }
        Ok(AccessToken::bearer(format!("token-for-{code}")))
    }

    async fn fetch_identity(&self, _token: &AccessToken) -> OAuthResult<RemoteIdentity> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch {
            return Err(OAuthError::Provider {
                status: 401,
                error: "invalid_token".to_string(),
                description: None,
            });
        }
        Ok(self.identity.clone())
    }
}

#[derive(Default)]
pub struct RecordingDirectory {
    users: Mutex<HashMap<String, User>>,
    created: Mutex<Vec<UserProfile>>,
    finds: AtomicUsize,
    conflict_on_create: bool,
    fail_lookup: bool,
}

impl RecordingDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, user: User) -> Self {
        self.users.lock().insert(user.username.clone(), user);
        self
    }

    /// Every creation loses a race against a concurrent login.
    pub fn conflicting() -> Self {
        Self {
            conflict_on_create: true,
            ..Self::default()
        }
    }

    pub fn failing_lookup() -> Self {
        Self {
            fail_lookup: true,
            ..Self::default()
        }
    }

    pub fn created(&self) -> Vec<UserProfile> {
        self.created.lock().clone()
    }

    pub fn find_calls(&self) -> usize {
        self.finds.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserDirectory for RecordingDirectory {
    async fn find_by_email(&self, email: &str) -> DirectoryResult<Option<User>> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        if self.fail_lookup {
            return Err(DirectoryError::Unavailable("directory offline".to_string()));
        }
        Ok(self.users.lock().get(email).cloned())
    }

    async fn create_user(&self, profile: &UserProfile) -> DirectoryResult<User> {
        self.created.lock().push(profile.clone());
        if self.conflict_on_create {
            return Err(DirectoryError::duplicate("username", &profile.username));
        }

        let mut users = self.users.lock();
        if users.contains_key(&profile.username) {
            return Err(DirectoryError::duplicate("username", &profile.username));
        }
        let user = User::from_profile(profile, format!("hashed:{}", profile.password));
        users.insert(profile.username.clone(), user.clone());
        Ok(user)
    }
}
