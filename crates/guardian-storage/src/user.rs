//! User storage provider trait.

use async_trait::async_trait;
use guardian_model::{DashboardSummary, UserRecord};

use crate::error::StorageResult;

/// Provider for user record storage.
///
/// Implementations must be thread-safe and support concurrent access.
#[async_trait]
pub trait UserProvider: Send + Sync {
    /// Appends a new record.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::Duplicate` if a record with the same id exists.
    async fn create(&self, user: &UserRecord) -> StorageResult<()>;

    /// Replaces the record with the same id.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if the record doesn't exist.
    async fn update(&self, user: &UserRecord) -> StorageResult<()>;

    /// Deletes a record by id, returning it.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if the record doesn't exist.
    async fn delete(&self, id: &str) -> StorageResult<UserRecord>;

    /// Gets a record by id.
    async fn get_by_id(&self, id: &str) -> StorageResult<Option<UserRecord>>;

    /// Searches for records matching criteria, in directory order.
    async fn search(&self, criteria: &UserSearchCriteria) -> StorageResult<Vec<UserRecord>>;

    /// Counts records matching criteria.
    async fn count(&self, criteria: &UserSearchCriteria) -> StorageResult<usize>;

    /// Replaces the whole collection.
    async fn replace_all(&self, users: Vec<UserRecord>) -> StorageResult<()>;

    /// Removes every record.
    async fn clear(&self) -> StorageResult<()>;

    /// Dashboard counters over every record.
    async fn summary(&self) -> StorageResult<DashboardSummary>;
}

/// Search criteria for user records.
#[derive(Debug, Default, Clone)]
pub struct UserSearchCriteria {
    /// Search string (matches username, email, first name, last name).
    pub search: Option<String>,
}

impl UserSearchCriteria {
    /// Creates an empty criteria that matches everything.
    #[must_use]
    pub const fn new() -> Self {
        Self { search: None }
    }

    /// Sets the search string.
    #[must_use]
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Whether a record satisfies the search term.
    #[must_use]
    pub fn matches(&self, user: &UserRecord) -> bool {
        self.search.as_deref().map_or(true, |term| user.matches(term))
    }
}
