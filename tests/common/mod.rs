//! Common test utilities and helpers
//!
//! Shared by the integration tests: a process runner that records every
//! invocation instead of running git, and fixtures that lay out a fleet
//! directory on disk.

#![allow(dead_code)]

pub mod mock_services;
pub mod test_fixtures;
