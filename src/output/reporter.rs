//! Reporting of per-action outcomes.

use crate::daemon::CycleReport;
use crate::error::ActionError;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, error, info};

/// Receives the outcome of every action the reconciler executes.
///
/// Each executed action produces exactly one call: a success callback or
/// [`Reporter::failed`].
pub trait Reporter {
    /// A source file was copied over its replica counterpart.
    fn copied(&self, source: &Path, replica: &Path);

    /// An orphaned replica file was removed.
    fn removed(&self, path: &Path);

    /// An action failed; the cycle carries on with the next one.
    fn failed(&self, error: &ActionError);

    /// A full cycle finished.
    fn cycle_completed(&self, _report: &CycleReport) {}
}

impl<T: Reporter + ?Sized> Reporter for &T {
    fn copied(&self, source: &Path, replica: &Path) {
        (**self).copied(source, replica);
    }

    fn removed(&self, path: &Path) {
        (**self).removed(path);
    }

    fn failed(&self, error: &ActionError) {
        (**self).failed(error);
    }

    fn cycle_completed(&self, report: &CycleReport) {
        (**self).cycle_completed(report);
    }
}

/// Production reporter: emits `tracing` events picked up by the log sinks.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn copied(&self, source: &Path, replica: &Path) {
        info!(
            "File synchronized: {} -> {}",
            source.display(),
            replica.display()
        );
    }

    fn removed(&self, path: &Path) {
        info!("File removed from replica: {}", path.display());
    }

    fn failed(&self, error: &ActionError) {
        error!("{error}");
    }

    fn cycle_completed(&self, report: &CycleReport) {
        debug!(
            "Cycle {} complete: {} copied, {} removed, {} failed",
            report.cycle, report.applied.copied, report.applied.removed, report.applied.failed
        );
    }
}

/// Something a [`MemoryReporter`] saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    /// Successful copy, with the replica destination
    Copied(PathBuf),
    /// Successful removal
    Removed(PathBuf),
    /// Failed copy, with the replica destination
    CopyFailed(PathBuf),
    /// Failed removal
    RemoveFailed(PathBuf),
    /// Cycle number that completed
    CycleCompleted(u64),
}

/// Records reported outcomes in memory for assertions.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    /// Events in the order they were reported
    events: Mutex<Vec<ReportEvent>>,
}

impl MemoryReporter {
    /// Create an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything reported so far
    #[must_use]
    pub fn events(&self) -> Vec<ReportEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Reported failures only
    #[must_use]
    pub fn failures(&self) -> Vec<ReportEvent> {
        self.events()
            .into_iter()
            .filter(|event| {
                matches!(
                    event,
                    ReportEvent::CopyFailed(_) | ReportEvent::RemoveFailed(_)
                )
            })
            .collect()
    }

    /// Forget everything recorded so far
    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Append an event
    fn push(&self, event: ReportEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl Reporter for MemoryReporter {
    fn copied(&self, _source: &Path, replica: &Path) {
        self.push(ReportEvent::Copied(replica.to_path_buf()));
    }

    fn removed(&self, path: &Path) {
        self.push(ReportEvent::Removed(path.to_path_buf()));
    }

    fn failed(&self, error: &ActionError) {
        let path = error.replica_path().to_path_buf();
        self.push(match error {
            ActionError::Copy { .. } => ReportEvent::CopyFailed(path),
            ActionError::Delete { .. } => ReportEvent::RemoveFailed(path),
        });
    }

    fn cycle_completed(&self, report: &CycleReport) {
        self.push(ReportEvent::CycleCompleted(report.cycle));
    }
}
