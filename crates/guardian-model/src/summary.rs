//! Dashboard counters.

use serde::{Deserialize, Serialize};

use crate::user::UserRecord;

/// Counts shown on the dashboard cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Total number of records.
    pub total: usize,
    /// Enabled records.
    pub active: usize,
    /// Disabled records.
    pub inactive: usize,
}

impl DashboardSummary {
    /// Counts over the given records.
    #[must_use]
    pub fn from_records(users: &[UserRecord]) -> Self {
        let active = users.iter().filter(|u| u.enabled).count();
        Self {
            total: users.len(),
            active,
            inactive: users.len() - active,
        }
    }
}
