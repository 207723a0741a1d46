//! Audit logging for console actions.
//!
//! Handlers build a [`guardian_core::Event`] for every login, logout, user
//! mutation, configuration save and connectivity test, and hand it to the
//! [`ConsoleEventLogger`] held in the application state.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use guardian_core::{Event, EventBuilder, EventType, IdpConfig};

/// Destination for console audit events.
#[async_trait]
pub trait ConsoleEventLogger: Send + Sync {
    /// Logs an event.
    ///
    /// # Errors
    ///
    /// Returns an error if the event could not be logged.
    async fn log(&self, event: Event) -> Result<(), EventLogError>;
}

/// Errors that can occur during event logging.
#[derive(Debug, thiserror::Error)]
pub enum EventLogError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

// ============================================================================
// In-Memory Logger (for testing)
// ============================================================================

/// In-memory event logger for testing.
#[derive(Debug, Default)]
pub struct InMemoryEventLogger {
    events: Mutex<Vec<Event>>,
}

impl InMemoryEventLogger {
    /// Creates a new in-memory logger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all logged events.
    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the logged events of one type.
    #[must_use]
    pub fn events_of(&self, event_type: EventType) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Clears all logged events.
    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[async_trait]
impl ConsoleEventLogger for InMemoryEventLogger {
    async fn log(&self, event: Event) -> Result<(), EventLogError> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
        Ok(())
    }
}

// ============================================================================
// Tracing Logger
// ============================================================================

/// Event logger that writes to the tracing framework at INFO level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventLogger;

impl TracingEventLogger {
    /// Creates a new tracing logger.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ConsoleEventLogger for TracingEventLogger {
    async fn log(&self, event: Event) -> Result<(), EventLogError> {
        let details = serde_json::to_string(&event.details)
            .map_err(|e| EventLogError::Serialization(e.to_string()))?;
        tracing::info!(
            event_id = %event.id,
            event_type = ?event.event_type,
            outcome = ?event.outcome,
            realm = ?event.realm,
            user_id = ?event.user_id,
            client_id = ?event.client_id,
            error = ?event.error,
            details = %details,
            "console_event"
        );
        Ok(())
    }
}

// ============================================================================
// Builder helpers
// ============================================================================

/// Starts an event carrying the realm and client of the active configuration.
#[must_use]
pub fn console_event(event_type: EventType, idp: Option<&IdpConfig>) -> EventBuilder {
    let builder = Event::builder(event_type);
    match idp {
        Some(config) if config.is_complete() => builder
            .realm(config.realm.trim())
            .client(config.client_id.trim()),
        _ => builder,
    }
}

/// Builds a user mutation event.
#[must_use]
pub fn user_event(
    event_type: EventType,
    idp: Option<&IdpConfig>,
    user_id: &str,
    username: &str,
) -> Event {
    console_event(event_type, idp)
        .user(user_id)
        .detail("resource_type", "user")
        .detail("resource_name", username)
        .success()
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_logger_stores_events() {
        let logger = InMemoryEventLogger::new();
        let event = Event::builder(EventType::Logout).success().build();

        logger.log(event).await.unwrap();

        let events = logger.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, EventType::Logout);

        logger.clear();
        assert!(logger.events().is_empty());
    }

    #[tokio::test]
    async fn tracing_logger_accepts_events() {
        let event = user_event(EventType::UserDeleted, None, "1", "joao.silva");
        assert!(TracingEventLogger::new().log(event).await.is_ok());
    }

    #[test]
    fn console_event_carries_configured_realm() {
        let config = IdpConfig::new("http://x", "acme", "console");
        let event = user_event(EventType::UserCreated, Some(&config), "7", "carla");

        assert_eq!(event.realm.as_deref(), Some("acme"));
        assert_eq!(event.client_id.as_deref(), Some("console"));
        assert_eq!(event.user_id.as_deref(), Some("7"));
        assert_eq!(event.detail("resource_name"), Some("carla"));
    }

    #[test]
    fn incomplete_config_is_not_attached() {
        let config = IdpConfig::new("", "acme", "console");
        let event = console_event(EventType::Login, Some(&config)).build();
        assert!(event.realm.is_none());
    }
}
