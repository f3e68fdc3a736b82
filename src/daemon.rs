//! The mirroring loop.
//!
//! A [`Daemon`] owns one source/replica pair. Each cycle scans both trees, plans the
//! actions that converge the replica and applies them. [`Daemon::run`] repeats cycles
//! on a [`Schedule`] until the [`Shutdown`] signal fires, the cycle limit is reached,
//! or a scan fails.

use crate::error::{Result, SyncError};
use crate::fs::FileSystem;
use crate::output::Reporter;
use crate::reconcile::{self, ApplyReport};
use crate::scanner::StateScanner;
use crate::schedule::{Schedule, Shutdown};
use std::path::PathBuf;
use tracing::{Level, debug, info, span};

/// Summary of one completed cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// 1-based cycle number
    pub cycle: u64,
    /// Files seen in the source tree
    pub source_files: usize,
    /// Files seen in the replica tree
    pub replica_files: usize,
    /// Actions planned
    pub planned: usize,
    /// What applying them did
    pub applied: ApplyReport,
}

/// Mirrors one source tree onto one replica tree.
pub struct Daemon<F, R> {
    /// Tree treated as the source of truth
    source: PathBuf,
    /// Tree kept consistent with the source
    replica: PathBuf,
    /// Filesystem both trees live on
    fs: F,
    /// Sink for action outcomes
    reporter: R,
    /// Cycles completed so far
    completed: u64,
}

impl<F: FileSystem, R: Reporter> Daemon<F, R> {
    /// Create a daemon for the given pair of roots
    pub fn new(source: impl Into<PathBuf>, replica: impl Into<PathBuf>, fs: F, reporter: R) -> Self {
        Self {
            source: source.into(),
            replica: replica.into(),
            fs,
            reporter,
            completed: 0,
        }
    }

    /// Number of cycles completed so far
    #[must_use]
    pub const fn cycles_completed(&self) -> u64 {
        self.completed
    }

    /// Create both roots (and their parents) if they are missing.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Bootstrap`] if a root cannot be created
    pub fn bootstrap(&self) -> Result<()> {
        for root in [&self.source, &self.replica] {
            self.fs
                .create_dir_all(root)
                .map_err(|source| SyncError::Bootstrap {
                    path: root.clone(),
                    source,
                })?;
        }
        Ok(())
    }

    /// Scan both trees and converge the replica once.
    ///
    /// Individual copy or delete failures are reported and do not fail the cycle.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Scan`] if either root cannot be scanned
    pub fn run_cycle(&mut self) -> Result<CycleReport> {
        let cycle = self.completed + 1;
        let span = span!(Level::DEBUG, "cycle", cycle);
        let _guard = span.enter();

        let scanner = StateScanner::new(&self.fs);
        let source = scanner.scan(&self.source)?;
        let replica = scanner.scan(&self.replica)?;

        let actions = reconcile::plan(&source, &replica);
        let applied = reconcile::apply(&actions, &source, &replica, &self.fs, &self.reporter);

        self.completed = cycle;
        let report = CycleReport {
            cycle,
            source_files: source.len(),
            replica_files: replica.len(),
            planned: actions.len(),
            applied,
        };
        self.reporter.cycle_completed(&report);
        Ok(report)
    }

    /// Bootstrap the roots, then run cycles on `schedule` until stopped.
    ///
    /// The interval is waited out after each cycle, so the effective period is the
    /// interval plus the cycle's own duration. Returns the number of cycles run.
    ///
    /// # Errors
    ///
    /// Returns an error if bootstrapping fails or a scan fails. Nothing is retried.
    pub fn run(&mut self, schedule: &Schedule, shutdown: &Shutdown) -> Result<u64> {
        self.bootstrap()?;
        info!(
            "Mirroring {} -> {} every {}",
            self.source.display(),
            self.replica.display(),
            humantime::format_duration(schedule.interval)
        );

        let mut ran = 0;
        while !shutdown.is_triggered() && !schedule.is_exhausted(ran) {
            self.run_cycle()?;
            ran += 1;
            if schedule.is_exhausted(ran) || shutdown.wait_timeout(schedule.interval) {
                break;
            }
        }

        debug!("Stopped after {ran} cycles");
        Ok(ran)
    }
}
