//! Agent account model.
//!
//! A [`User`] is the local back-office account. It is created by the user
//! directory from a [`UserProfile`]; the login flow only supplies values.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// Account may log in.
    #[default]
    Active,
    /// Account is blocked by an administrator.
    Blocked,
    /// Account is soft-deleted.
    Deleted,
}

impl UserStatus {
    /// Returns the wire name of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Blocked => "blocked",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A local back-office account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: Uuid,
    /// Unique username; for provisioned agents this is their email.
    pub username: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Stored password hash (PHC string).
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Account status.
    pub status: UserStatus,
    /// Whether the account may act as an agent.
    pub is_agent: bool,
    /// Preferred locale, if set.
    pub locale: Option<String>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates an active, non-agent user with the given username.
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            username: username.into(),
            first_name: String::new(),
            last_name: String::new(),
            password_hash: String::new(),
            status: UserStatus::Active,
            is_agent: false,
            locale: None,
            created_at: Utc::now(),
        }
    }

    /// Builds a user from a profile and an already hashed password.
    #[must_use]
    pub fn from_profile(profile: &UserProfile, password_hash: impl Into<String>) -> Self {
        Self {
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            password_hash: password_hash.into(),
            status: profile.status,
            is_agent: profile.is_agent,
            locale: profile.locale.clone(),
            ..Self::new(profile.username.clone())
        }
    }

    /// Marks the user as an agent.
    #[must_use]
    pub const fn with_agent(mut self, is_agent: bool) -> Self {
        self.is_agent = is_agent;
        self
    }

    /// Sets the user's names.
    #[must_use]
    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = first.into();
        self.last_name = last.into();
        self
    }
}

/// Values supplied when creating an account.
///
/// `password` is plaintext here; the directory is responsible for hashing it.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct UserProfile {
    /// Username.
    pub username: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Initial password.
    pub password: String,
    /// Initial status.
    pub status: UserStatus,
    /// Whether the account is an agent.
    pub is_agent: bool,
    /// Locale; `None` leaves the directory default in place.
    pub locale: Option<String>,
}

impl UserProfile {
    /// Creates a profile for the given username.
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Self::default()
        }
    }

    /// Sets the first name.
    #[must_use]
    pub fn with_first_name(mut self, name: impl Into<String>) -> Self {
        self.first_name = name.into();
        self
    }

    /// Sets the last name.
    #[must_use]
    pub fn with_last_name(mut self, name: impl Into<String>) -> Self {
        self.last_name = name.into();
        self
    }

    /// Sets the initial password.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Sets the initial status.
    #[must_use]
    pub const fn with_status(mut self, status: UserStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the agent flag.
    #[must_use]
    pub const fn with_agent(mut self, is_agent: bool) -> Self {
        self.is_agent = is_agent;
        self
    }
}

impl fmt::Debug for UserProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserProfile")
            .field("username", &self.username)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("password", &"[redacted]")
            .field("status", &self.status)
            .field("is_agent", &self.is_agent)
            .field("locale", &self.locale)
            .finish()
    }
}
