//! The ordered user record collection.
//!
//! [`UserDirectory`] is a value: every mutation consumes the directory and
//! returns the next one, so callers decide where the current value lives.
//! Insertion order is the display order and is never rearranged.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::summary::DashboardSummary;
use crate::user::UserRecord;

/// Errors raised by directory updates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// A record with this identifier is already present.
    #[error("user id already present: {0}")]
    DuplicateId(String),

    /// No record has this identifier.
    #[error("no user with id {0}")]
    UnknownId(String),

    /// The draft was rejected.
    #[error("invalid user draft: {0}")]
    InvalidDraft(String),
}

/// Ordered collection of user records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserDirectory {
    users: Vec<UserRecord>,
}

impl UserDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub const fn new() -> Self {
        Self { users: Vec::new() }
    }

    /// Creates a directory from records, keeping their order.
    #[must_use]
    pub fn from_records(users: Vec<UserRecord>) -> Self {
        Self { users }
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether the directory is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Records in display order.
    #[must_use]
    pub fn as_slice(&self) -> &[UserRecord] {
        &self.users
    }

    /// Consumes the directory, returning its records.
    #[must_use]
    pub fn into_records(self) -> Vec<UserRecord> {
        self.users
    }

    /// Finds a record by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&UserRecord> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Returns the records matching `term`, in order.
    ///
    /// Matching is a case-insensitive substring test over username, email,
    /// first and last name. An empty term matches every record.
    #[must_use]
    pub fn filter(&self, term: &str) -> Vec<UserRecord> {
        self.users
            .iter()
            .filter(|u| u.matches(term))
            .cloned()
            .collect()
    }

    /// Appends a record.
    pub fn with_inserted(mut self, user: UserRecord) -> Result<Self, DirectoryError> {
        if self.get(&user.id).is_some() {
            return Err(DirectoryError::DuplicateId(user.id));
        }
        self.users.push(user);
        Ok(self)
    }

    /// Replaces the record whose identifier matches `user.id`.
    ///
    /// Every other record is left untouched and in place.
    pub fn with_replaced(mut self, user: UserRecord) -> Result<Self, DirectoryError> {
        match self.users.iter_mut().find(|u| u.id == user.id) {
            Some(slot) => {
                *slot = user;
                Ok(self)
            }
            None => Err(DirectoryError::UnknownId(user.id)),
        }
    }

    /// Removes the record with `id`, returning the new directory and the
    /// removed record.
    pub fn with_removed(mut self, id: &str) -> Result<(Self, UserRecord), DirectoryError> {
        let position = self
            .users
            .iter()
            .position(|u| u.id == id)
            .ok_or_else(|| DirectoryError::UnknownId(id.to_string()))?;
        let removed = self.users.remove(position);
        Ok((self, removed))
    }

    /// Dashboard counters over all records.
    #[must_use]
    pub fn summary(&self) -> DashboardSummary {
        DashboardSummary::from_records(&self.users)
    }
}
