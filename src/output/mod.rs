//! Logging and outcome reporting.
//!
//! This module provides:
//! - The [`Reporter`] capability the reconciler reports every action through
//! - A tracing-backed reporter for production and an in-memory one for tests
//! - Log sink setup writing `timestamp - message` lines to a file and stderr
//! - Verbosity control (quiet, normal, verbose)

mod format;
mod reporter;

pub use format::{LineFormat, TIMESTAMP_FORMAT};
pub use reporter::{MemoryReporter, ReportEvent, Reporter, TracingReporter};

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Verbosity level for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Only warnings and errors.
    Quiet,
    /// Every action outcome.
    #[default]
    Normal,
    /// Action outcomes plus cycle summaries and skipped entries.
    Verbose,
}

impl Verbosity {
    /// Resolve the level from the `--quiet` / `--verbose` flags (verbose wins).
    #[must_use]
    pub const fn from_flags(quiet: bool, verbose: bool) -> Self {
        if verbose {
            Self::Verbose
        } else if quiet {
            Self::Quiet
        } else {
            Self::Normal
        }
    }

    /// Filter directive used when `RUST_LOG` is not set.
    #[must_use]
    pub const fn directive(self) -> &'static str {
        match self {
            Self::Quiet => "warn",
            Self::Normal => "warn,dirmirror=info",
            Self::Verbose => "warn,dirmirror=debug",
        }
    }
}

/// Install the process-wide log sinks: `log_file` (appended to) and stderr.
///
/// The log file's parent directory is created if missing. `RUST_LOG` overrides the
/// level derived from `verbosity`.
///
/// # Errors
///
/// Returns an error if:
/// - The log directory cannot be created
/// - The log file cannot be opened for appending
/// - A global subscriber is already installed
pub fn init_logging(log_file: &Path, verbosity: Verbosity) -> Result<()> {
    if let Some(parent) = log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create log directory: {}", parent.display())
        })?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Failed to open log file: {}", log_file.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));

    let file_layer = tracing_subscriber::fmt::layer()
        .event_format(LineFormat)
        .with_ansi(false)
        .with_writer(Mutex::new(file));

    let console_layer = tracing_subscriber::fmt::layer()
        .event_format(LineFormat)
        .with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("Failed to install log subscriber")?;

    Ok(())
}
