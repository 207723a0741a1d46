//! # guardian-storage
//!
//! Storage abstraction traits and implementations for the Guardian console.
//!
//! ## Provider Traits
//!
//! - [`UserProvider`] - the record directory (search, create, edit, delete)
//! - [`ConfigStore`] - the persisted identity-provider configuration
//!
//! ## Implementations
//!
//! - [`InMemoryUserProvider`] - records live for the lifetime of the process
//! - [`FileConfigStore`] - JSON document on disk keyed by `keycloak-config`
//! - [`InMemoryConfigStore`] - for tests and ephemeral deployments

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod config_store;
pub mod error;
pub mod memory;
pub mod user;

pub use config_store::{ConfigStore, FileConfigStore, InMemoryConfigStore};
pub use error::{StorageError, StorageResult};
pub use memory::InMemoryUserProvider;
pub use user::{UserProvider, UserSearchCriteria};
