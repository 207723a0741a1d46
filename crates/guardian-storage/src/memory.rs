//! In-memory user provider.
//!
//! Records live for the lifetime of the process. Each mutation computes the
//! next [`UserDirectory`] from a copy of the current one and swaps it in, so a
//! failed update leaves the stored value untouched.

use async_trait::async_trait;
use guardian_model::{DashboardSummary, UserDirectory, UserRecord};
use tokio::sync::RwLock;

use crate::error::StorageResult;
use crate::user::{UserProvider, UserSearchCriteria};

/// In-memory user record store.
#[derive(Debug, Default)]
pub struct InMemoryUserProvider {
    directory: RwLock<UserDirectory>,
}

impl InMemoryUserProvider {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with records.
    #[must_use]
    pub fn with_users(users: Vec<UserRecord>) -> Self {
        Self {
            directory: RwLock::new(UserDirectory::from_records(users)),
        }
    }

    /// Returns a copy of the current directory.
    pub async fn snapshot(&self) -> UserDirectory {
        self.directory.read().await.clone()
    }
}

#[async_trait]
impl UserProvider for InMemoryUserProvider {
    async fn create(&self, user: &UserRecord) -> StorageResult<()> {
        let mut directory = self.directory.write().await;
        *directory = directory.clone().with_inserted(user.clone())?;
        tracing::debug!(user_id = %user.id, "user record created");
        Ok(())
    }

    async fn update(&self, user: &UserRecord) -> StorageResult<()> {
        let mut directory = self.directory.write().await;
        *directory = directory.clone().with_replaced(user.clone())?;
        tracing::debug!(user_id = %user.id, "user record updated");
        Ok(())
    }

    async fn delete(&self, id: &str) -> StorageResult<UserRecord> {
        let mut directory = self.directory.write().await;
        let (next, removed) = directory.clone().with_removed(id)?;
        *directory = next;
        tracing::debug!(user_id = %id, "user record deleted");
        Ok(removed)
    }

    async fn get_by_id(&self, id: &str) -> StorageResult<Option<UserRecord>> {
        Ok(self.directory.read().await.get(id).cloned())
    }

    async fn search(&self, criteria: &UserSearchCriteria) -> StorageResult<Vec<UserRecord>> {
        let directory = self.directory.read().await;
        Ok(directory
            .as_slice()
            .iter()
            .filter(|u| criteria.matches(u))
            .cloned()
            .collect())
    }

    async fn count(&self, criteria: &UserSearchCriteria) -> StorageResult<usize> {
        let directory = self.directory.read().await;
        Ok(directory
            .as_slice()
            .iter()
            .filter(|u| criteria.matches(u))
            .count())
    }

    async fn replace_all(&self, users: Vec<UserRecord>) -> StorageResult<()> {
        *self.directory.write().await = UserDirectory::from_records(users);
        Ok(())
    }

    async fn clear(&self) -> StorageResult<()> {
        *self.directory.write().await = UserDirectory::new();
        Ok(())
    }

    async fn summary(&self) -> StorageResult<DashboardSummary> {
        Ok(self.directory.read().await.summary())
    }
}
