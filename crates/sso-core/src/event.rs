//! Audit events for agent logins.
//!
//! A login attempt produces an event per milestone (code exchanged, agent
//! provisioned, login) or one failure event carrying the failing stage.
//! The end user only ever sees a generic failure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event type categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// Agent logged in.
    Login,
    /// Agent login failed.
    LoginError,
    /// Authorization code exchanged for a token.
    CodeToToken,
    /// Code exchange failed.
    CodeToTokenError,
    /// Agent account provisioned on first login.
    Register,
    /// Agent provisioning failed.
    RegisterError,
}

/// Outcome of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventOutcome {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Failure,
}

/// A security event for audit logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Unique event identifier.
    pub id: Uuid,
    /// Timestamp of the event.
    pub timestamp: DateTime<Utc>,
    /// Type of event.
    pub event_type: EventType,
    /// Outcome of the event.
    pub outcome: EventOutcome,
    /// Local user ID, once resolved.
    pub user_id: Option<Uuid>,
    /// Username (the verified remote email), once known.
    pub username: Option<String>,
    /// OAuth client ID the login went through.
    pub client_id: Option<String>,
    /// Error code (for failure events).
    pub error: Option<String>,
    /// Additional details as key-value pairs.
    pub details: Vec<(String, String)>,
}

impl Event {
    /// Creates a new event builder.
    #[must_use]
    pub const fn builder(event_type: EventType) -> EventBuilder {
        EventBuilder::new(event_type)
    }

    /// Writes the event to the log.
    ///
    /// Failures are logged at `warn`, successes at `info`.
    pub fn emit(&self) {
        let details = self
            .details
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(",");

        match self.outcome {
            EventOutcome::Success => tracing::info!(
                event_id = %self.id,
                event_type = ?self.event_type,
                user_id = ?self.user_id,
                username = ?self.username,
                client_id = ?self.client_id,
                details = %details,
                "audit event"
            ),
            EventOutcome::Failure => tracing::warn!(
                event_id = %self.id,
                event_type = ?self.event_type,
                username = ?self.username,
                client_id = ?self.client_id,
                error = ?self.error,
                details = %details,
                "audit event"
            ),
        }
    }
}

/// Builder for creating events.
pub struct EventBuilder {
    event_type: EventType,
    outcome: EventOutcome,
    user_id: Option<Uuid>,
    username: Option<String>,
    client_id: Option<String>,
    error: Option<String>,
    details: Vec<(String, String)>,
}

impl EventBuilder {
    /// Creates a new event builder.
    #[must_use]
    pub const fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            outcome: EventOutcome::Success,
            user_id: None,
            username: None,
            client_id: None,
            error: None,
            details: Vec::new(),
        }
    }

    /// Sets the outcome to failure with an error code.
    #[must_use]
    pub fn failure(mut self, error: impl Into<String>) -> Self {
        self.outcome = EventOutcome::Failure;
        self.error = Some(error.into());
        self
    }

    /// Sets the user ID.
    #[must_use]
    pub const fn user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Sets the username.
    #[must_use]
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Sets the client ID.
    #[must_use]
    pub fn client(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Adds a detail key-value pair.
    #[must_use]
    pub fn detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.push((key.into(), value.into()));
        self
    }

    /// Builds the event.
    #[must_use]
    pub fn build(self) -> Event {
        Event {
            id: Uuid::now_v7(),
            timestamp: Utc::now(),
            event_type: self.event_type,
            outcome: self.outcome,
            user_id: self.user_id,
            username: self.username,
            client_id: self.client_id,
            error: self.error,
            details: self.details,
        }
    }
}
