//! Mock records loaded when an operator logs in.

use chrono::{DateTime, Duration, Utc};

use crate::user::UserRecord;

/// The three records the console starts with after login.
///
/// Creation times are one, two and three days before `now`.
#[must_use]
pub fn seed_users(now: DateTime<Utc>) -> Vec<UserRecord> {
    vec![
        UserRecord::new("admin")
            .with_id("1")
            .with_email("admin@empresa.com")
            .with_name("Admin", "Sistema")
            .created_at(now - Duration::days(1)),
        UserRecord::new("joao.silva")
            .with_id("2")
            .with_email("joao.silva@empresa.com")
            .with_name("João", "Silva")
            .created_at(now - Duration::days(2)),
        UserRecord::new("maria.santos")
            .with_id("3")
            .with_email("maria.santos@empresa.com")
            .with_name("Maria", "Santos")
            .with_enabled(false)
            .created_at(now - Duration::days(3)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_ids_are_unique() {
        let users = seed_users(Utc::now());
        let mut ids: Vec<_> = users.iter().map(|u| u.id.as_str()).collect();
        ids.dedup();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }
}
