//! # guardian-model
//!
//! Domain models for the Keycloak Guardian console.
//!
//! - [`user`] - user records and the create/edit draft
//! - [`directory`] - the ordered record collection and its pure update functions
//! - [`summary`] - dashboard counters
//! - [`seed`] - the mock records loaded on login

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod directory;
pub mod seed;
pub mod summary;
pub mod user;

pub use directory::{DirectoryError, UserDirectory};
pub use seed::seed_users;
pub use summary::DashboardSummary;
pub use user::{UserDraft, UserRecord};
