#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
// Allow pedantic strict lints that create false positives in this codebase
#![allow(clippy::arithmetic_side_effects)] // Action counters cannot overflow

//! # dirmirror - Periodic One-Way Directory Mirroring
//!
//! dirmirror keeps a replica directory consistent with a source directory. Every cycle
//! it snapshots both trees, copies files that are missing from the replica or older
//! there, and removes replica files that no longer exist in the source.
//!
//! ## Features
//!
//! - **Timestamp-Based Staleness**: a file is copied only when its replica is missing or
//!   strictly older; equal modification times count as in sync
//! - **Metadata Preservation**: copies keep the source modification time and permissions
//! - **Failure Isolation**: one failed copy or delete never stops the rest of a cycle
//! - **Graceful Shutdown**: the wait between cycles is interruptible
//!
//! ## Architecture
//!
//! - [`scanner`]: captures a [`scanner::DirectorySnapshot`] of one tree
//! - [`reconcile`]: diffs two snapshots into actions and applies them
//! - [`daemon`]: drives cycles on a schedule
//! - [`fs`]: the filesystem capability, real and in-memory
//! - [`output`]: outcome reporting and log sinks
//! - [`schedule`]: cycle timing and shutdown signalling
//! - [`config`]: validated runtime configuration
//!
//! ## Example Usage
//!
//! ```no_run
//! use dirmirror::daemon::Daemon;
//! use dirmirror::fs::LocalFs;
//! use dirmirror::output::TracingReporter;
//!
//! # fn main() -> Result<(), dirmirror::error::SyncError> {
//! let mut daemon = Daemon::new("/srv/data", "/mnt/backup/data", LocalFs::new(), TracingReporter);
//! daemon.bootstrap()?;
//! let report = daemon.run_cycle()?;
//! println!("{} actions", report.planned);
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions (argument parsing structures).
pub mod cli;

/// Runtime configuration and validation.
pub mod config;

/// The cycle loop tying scanning and reconciliation together.
pub mod daemon;

/// Error taxonomy for scans, actions and configuration.
pub mod error;

/// Filesystem capability and its implementations.
pub mod fs;

/// Outcome reporting and log output.
pub mod output;

/// Snapshot diffing and action execution.
pub mod reconcile;

/// Directory tree snapshots.
pub mod scanner;

/// Cycle scheduling and shutdown.
pub mod schedule;

/// Utility functions and helpers.
pub mod utils;

/// Current version of the dirmirror binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
