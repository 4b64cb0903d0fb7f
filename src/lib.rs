//! # fleet-sync - Service Fleet Synchronizer
//!
//! `fleet-sync` keeps a local checkout of a fleet of service repositories in step with
//! their remotes. The set of services is not configured anywhere: every file in the
//! manifest directory (`service-compose/serviceA.yaml`, `service-compose/serviceB.yml`, ...)
//! registers one repository named after the file.
//!
//! ## Features
//!
//! - **Clone**: Check out every service that is not present yet
//! - **Pull**: Refresh every service that is already checked out
//! - **Update**: Switch every checkout back to the trunk branch and pull
//! - **Parallel Operations**: One independent task per repository, all running concurrently
//! - **Failure Isolation**: A failing repository never stops or delays the others
//!
//! ## Quick Start
//!
//! ```bash
//! # service-compose/serviceA.yaml and service-compose/serviceB.yml exist
//! fleet-sync clone
//! # Skipped serviceA (already exists)
//! # Successfully cloned serviceB
//!
//! fleet-sync update --jobs 8
//! ```
//!
//! ## Architecture
//!
//! The crate is organized using clean architecture principles:
//!
//! - [`domain`]: Repository names, locations, sync tasks and results, configuration
//! - [`application`]: The per-operation sync policy and the concurrent orchestrator
//! - [`infrastructure`]: Manifest scanning, configuration storage and process execution
//! - [`presentation`]: CLI interface and result formatting
//! - [`common`]: Shared error handling
//!
//! ## Error Handling
//!
//! - [`common::error::FleetError`]: Fatal errors that abort a run before any task starts
//! - [`common::result::FleetResult`]: Type alias for `Result<T, FleetError>`
//!
//! Per-repository problems are never errors: they are reported as
//! [`domain::entities::sync_task::SyncResult`] values with a `Failed` or `Skipped` status.
//!
//! ## Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use fleet_sync::application::use_cases::sync_repositories::{
//!     SyncOrchestrator, SyncRepositoriesConfig,
//! };
//! use fleet_sync::domain::entities::sync_task::SyncOperation;
//! use fleet_sync::infrastructure::{ManifestScanner, SystemProcessRunner};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let base = std::path::Path::new("/work/core");
//! let names = ManifestScanner::new().scan(&base.join("service-compose"))?;
//!
//! let config = SyncRepositoriesConfig::new(base).with_max_concurrency(8);
//! let orchestrator = SyncOrchestrator::new(config, Arc::new(SystemProcessRunner::new()))?;
//!
//! let report = orchestrator.execute(&names, SyncOperation::Pull).await?;
//! println!("{} failed", report.failed());
//! # Ok(())
//! # }
//! ```

#![deny(rustdoc::broken_intra_doc_links)]

pub mod application;
pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// Re-export commonly used types for convenience
pub use crate::common::error::FleetError;
pub use crate::common::result::FleetResult as Result;
