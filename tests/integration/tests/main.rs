//! End-to-End Integration Tests
//!
//! These tests run the console on an ephemeral local port and drive it over
//! HTTP, with a mock identity provider where one is needed.

mod common;
mod console_flow;
mod idp_settings;
