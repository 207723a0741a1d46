//! Audit events for console actions.
//!
//! Every state-changing console action (login, logout, user mutations,
//! configuration changes, connectivity tests) produces an [`Event`]. Events
//! carry:
//! - Timestamp (ISO 8601)
//! - Event type and outcome
//! - Realm and client context (when configured)
//! - Affected resource details

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event type categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    // Session events
    /// Operator logged in (locally or through the redirect).
    Login,
    /// Operator was sent to the identity provider.
    LoginRedirect,
    /// Login attempt failed or returned an error.
    LoginError,
    /// Operator logged out.
    Logout,

    // Directory events
    /// User record created.
    UserCreated,
    /// User record updated.
    UserUpdated,
    /// User record deleted.
    UserDeleted,

    // Settings events
    /// Identity-provider configuration saved.
    ConfigSaved,
    /// Identity-provider connectivity tested.
    ConnectionTested,
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

/// A console audit event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Unique event identifier.
    pub id: Uuid,

    /// Timestamp of the event (ISO 8601).
    pub timestamp: DateTime<Utc>,

    /// Type of event.
    pub event_type: EventType,

    /// Outcome of the event.
    pub outcome: EventOutcome,

    /// Realm the console was configured for.
    pub realm: Option<String>,

    /// Affected user record ID.
    pub user_id: Option<String>,

    /// Client ID the console was configured with.
    pub client_id: Option<String>,

    /// Error message (for failure events).
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

    /// Looks up a detail value by key.
    #[must_use]
    pub fn detail(&self, key: &str) -> Option<&str> {
        self.details
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Builder for creating events.
pub struct EventBuilder {
    event_type: EventType,
    outcome: EventOutcome,
    realm: Option<String>,
    user_id: Option<String>,
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
            realm: None,
            user_id: None,
            client_id: None,
            error: None,
            details: Vec::new(),
        }
    }

    /// Sets the outcome to success.
    #[must_use]
    pub const fn success(mut self) -> Self {
        self.outcome = EventOutcome::Success;
        self
    }

    /// Sets the outcome to failure with an error message.
    #[must_use]
    pub fn failure(mut self, error: impl Into<String>) -> Self {
        self.outcome = EventOutcome::Failure;
        self.error = Some(error.into());
        self
    }

    /// Sets the realm.
    #[must_use]
    pub fn realm(mut self, realm: impl Into<String>) -> Self {
        self.realm = Some(realm.into());
        self
    }

    /// Sets the affected user record ID.
    #[must_use]
    pub fn user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
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
            realm: self.realm,
            user_id: self.user_id,
            client_id: self.client_id,
            error: self.error,
            details: self.details,
        }
    }
}
