//! Security principal produced by a successful login.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::user::User;

/// Roles granted to an authenticated agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgentRole {
    /// Back-office agent.
    #[serde(rename = "ROLE_AGENT")]
    Agent,
    /// May impersonate storefront customers.
    #[serde(rename = "ROLE_ALLOWED_TO_SWITCH")]
    AllowedToSwitch,
}

impl AgentRole {
    /// Returns the role name as seen by the hosting framework.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Agent => "ROLE_AGENT",
            Self::AllowedToSwitch => "ROLE_ALLOWED_TO_SWITCH",
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated user together with its granted roles.
///
/// Created fresh for every successful login and never persisted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityPrincipal {
    user: User,
    roles: BTreeSet<AgentRole>,
}

impl SecurityPrincipal {
    /// Wraps a user as an agent with `{AGENT, ALLOWED_TO_SWITCH}`.
    #[must_use]
    pub fn agent(user: User) -> Self {
        Self {
            user,
            roles: BTreeSet::from([AgentRole::Agent, AgentRole::AllowedToSwitch]),
        }
    }

    /// Gets the wrapped user.
    #[must_use]
    pub const fn user(&self) -> &User {
        &self.user
    }

    /// Gets the username of the wrapped user.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.user.username
    }

    /// Gets the granted roles.
    #[must_use]
    pub const fn roles(&self) -> &BTreeSet<AgentRole> {
        &self.roles
    }

    /// Gets the granted role names.
    #[must_use]
    pub fn role_names(&self) -> Vec<&'static str> {
        self.roles.iter().map(AgentRole::as_str).collect()
    }

    /// Checks whether a role is granted.
    #[must_use]
    pub fn has_role(&self, role: AgentRole) -> bool {
        self.roles.contains(&role)
    }
}
