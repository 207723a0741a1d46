//! # guardian-core
//!
//! Core configuration, error handling and audit events for the Keycloak
//! Guardian console.
//!
//! This crate provides the foundational types shared by every other
//! `guardian-*` crate:
//!
//! - [`config`] - the identity-provider configuration object
//! - [`error`] - the console error type
//! - [`event`] - structured audit events for console actions

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod config;
pub mod error;
pub mod event;

pub use config::{IdpConfig, CONFIG_STORAGE_KEY};
pub use error::{Error, Result};
pub use event::{Event, EventBuilder, EventOutcome, EventType};
