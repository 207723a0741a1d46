//! # guardian-cli
//!
//! Command-line client for the Guardian console API.
//!
//! This crate provides command-line utilities for:
//! - Logging in (identity-provider redirect or local) and out
//! - User record management (list, search, create, update, delete)
//! - Identity-provider settings and connectivity testing
//! - The CLI's own settings

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::future_not_send)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::Cli;
pub use config::CliConfig;
pub use error::{CliError, CliResult};
