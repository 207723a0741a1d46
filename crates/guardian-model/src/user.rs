//! User record model.
//!
//! Records are owned by the console, not by the identity provider: the
//! identifier is generated locally and nothing is synchronized upstream.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::directory::DirectoryError;

/// Display format for creation timestamps (`dd/mm/YYYY HH:MM`).
pub const CREATED_DISPLAY_FORMAT: &str = "%d/%m/%Y %H:%M";

/// A user record managed by the console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Identifier, unique within the directory.
    pub id: String,
    /// Login name.
    pub username: String,
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// First name.
    #[serde(default)]
    pub first_name: String,
    /// Last name.
    #[serde(default)]
    pub last_name: String,
    /// Whether the account is enabled.
    pub enabled: bool,
    /// Creation time, serialized as epoch milliseconds.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_timestamp: DateTime<Utc>,
}

impl UserRecord {
    /// Creates an enabled record with a freshly generated identifier.
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            username: username.into(),
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            enabled: true,
            created_timestamp: Utc::now(),
        }
    }

    /// Overrides the identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets the email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Sets first and last name.
    #[must_use]
    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = first.into();
        self.last_name = last.into();
        self
    }

    /// Sets whether the account is enabled.
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Sets the creation time.
    #[must_use]
    pub const fn created_at(mut self, created: DateTime<Utc>) -> Self {
        self.created_timestamp = created;
        self
    }

    /// `"{first} {last}"`, trimmed when either part is empty.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Human-readable account status.
    #[must_use]
    pub const fn status_label(&self) -> &'static str {
        if self.enabled {
            "Active"
        } else {
            "Inactive"
        }
    }

    /// Creation time in [`CREATED_DISPLAY_FORMAT`].
    #[must_use]
    pub fn created_display(&self) -> String {
        self.created_timestamp
            .format(CREATED_DISPLAY_FORMAT)
            .to_string()
    }

    /// Case-insensitive substring match against username, email and names.
    #[must_use]
    pub fn matches(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        [
            &self.username,
            &self.email,
            &self.first_name,
            &self.last_name,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

fn default_enabled() -> bool {
    true
}

/// Field values captured by the create/edit form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDraft {
    /// Login name (required).
    pub username: String,
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// First name.
    #[serde(default)]
    pub first_name: String,
    /// Last name.
    #[serde(default)]
    pub last_name: String,
    /// Whether the account is enabled.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl UserDraft {
    /// Creates an enabled draft with only a username.
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            enabled: true,
        }
    }

    /// Pre-fills a draft from an existing record (edit form).
    #[must_use]
    pub fn from_record(record: &UserRecord) -> Self {
        Self {
            username: record.username.clone(),
            email: record.email.clone(),
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            enabled: record.enabled,
        }
    }

    /// Rejects drafts the form would not submit.
    pub fn validate(&self) -> Result<(), DirectoryError> {
        if self.username.trim().is_empty() {
            return Err(DirectoryError::InvalidDraft(
                "username cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Builds a new record with a generated identifier.
    #[must_use]
    pub fn into_record(self, created: DateTime<Utc>) -> UserRecord {
        UserRecord {
            id: Uuid::now_v7().to_string(),
            username: self.username,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            enabled: self.enabled,
            created_timestamp: created,
        }
    }

    /// Applies the draft onto an existing record, keeping its identity and
    /// creation time.
    #[must_use]
    pub fn apply_to(&self, record: &UserRecord) -> UserRecord {
        UserRecord {
            id: record.id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            enabled: self.enabled,
            created_timestamp: record.created_timestamp,
        }
    }
}
