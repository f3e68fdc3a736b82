//! Reconciliation of a replica tree against its source.
//!
//! [`plan`] diffs two [`DirectorySnapshot`]s into [`SyncAction`]s. [`apply`] executes
//! them one by one, reporting each outcome and never letting one failure stop the rest.
//!
//! Staleness is judged by modification time alone. A replica file is rewritten only
//! when it is missing or strictly older than its source. Two files with equal
//! timestamps count as in sync even if their content differs.

use crate::error::ActionError;
use crate::fs::FileSystem;
use crate::output::Reporter;
use crate::scanner::DirectorySnapshot;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{Level, span};

/// One step towards a converged replica. Paths are relative to the tree roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAction {
    /// Copy the source file over the replica, creating parents as needed
    Copy(PathBuf),
    /// Remove a replica file that has no source counterpart
    Delete(PathBuf),
}

impl SyncAction {
    /// Relative path the action applies to
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Copy(path) | Self::Delete(path) => path,
        }
    }
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Copy(path) => write!(f, "copy {}", path.display()),
            Self::Delete(path) => write!(f, "delete {}", path.display()),
        }
    }
}

/// Counts of what [`apply`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Successful copies
    pub copied: usize,
    /// Successful removals
    pub removed: usize,
    /// Actions that failed
    pub failed: usize,
}

impl ApplyReport {
    /// Total number of actions executed
    #[must_use]
    pub const fn total(&self) -> usize {
        self.copied + self.removed + self.failed
    }
}

/// Compute the actions that converge `replica` onto `source`.
///
/// All deletes come first, then all copies, each group in path order. Clearing orphans
/// first lets a copy land where the replica held a directory of stale files.
#[must_use]
pub fn plan(source: &DirectorySnapshot, replica: &DirectorySnapshot) -> Vec<SyncAction> {
    let deletes = replica
        .iter()
        .filter(|(path, _)| !source.contains(path))
        .map(|(path, _)| SyncAction::Delete(path.clone()));

    let copies = source
        .iter()
        .filter(|(path, source_time)| {
            replica
                .modified(path)
                .is_none_or(|replica_time| replica_time < **source_time)
        })
        .map(|(path, _)| SyncAction::Copy(path.clone()));

    deletes.chain(copies).collect()
}

/// Execute `actions` between the roots of `source` and `replica`.
///
/// Every action is attempted. Each one results in exactly one report: a success
/// callback or [`Reporter::failed`].
pub fn apply<F, R>(
    actions: &[SyncAction],
    source: &DirectorySnapshot,
    replica: &DirectorySnapshot,
    fs: &F,
    reporter: &R,
) -> ApplyReport
where
    F: FileSystem + ?Sized,
    R: Reporter + ?Sized,
{
    let span = span!(Level::DEBUG, "apply", actions = actions.len());
    let _guard = span.enter();

    let mut report = ApplyReport::default();
    for action in actions {
        match action {
            SyncAction::Copy(relative) => {
                let from = source.absolute(relative);
                let to = replica.absolute(relative);
                match copy_into_place(fs, &from, &to) {
                    Ok(()) => {
                        reporter.copied(&from, &to);
                        report.copied += 1;
                    }
                    Err(err) => {
                        reporter.failed(&ActionError::Copy {
                            source_path: from,
                            replica_path: to,
                            source: err,
                        });
                        report.failed += 1;
                    }
                }
            }
            SyncAction::Delete(relative) => {
                let path = replica.absolute(relative);
                match fs.remove_file(&path) {
                    Ok(()) => {
                        reporter.removed(&path);
                        report.removed += 1;
                    }
                    Err(err) => {
                        reporter.failed(&ActionError::Delete { path, source: err });
                        report.failed += 1;
                    }
                }
            }
        }
    }

    report
}

/// Create the destination's parent directories, then copy.
fn copy_into_place<F: FileSystem + ?Sized>(
    fs: &F,
    from: &Path,
    to: &Path,
) -> std::io::Result<()> {
    if let Some(parent) = to.parent() {
        fs.create_dir_all(parent)?;
    }
    fs.copy_file(from, to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFs;
    use crate::output::{MemoryReporter, ReportEvent};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    fn at(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    fn snapshot(root: &str, entries: &[(&str, u64)]) -> DirectorySnapshot {
        DirectorySnapshot::from_entries(
            root,
            entries
                .iter()
                .map(|(path, secs)| (PathBuf::from(path), at(*secs))),
        )
    }

    #[rstest]
    #[case::missing_in_replica(None, true)]
    #[case::replica_older(Some(5), true)]
    #[case::equal_timestamps(Some(10), false)]
    #[case::replica_newer(Some(15), false)]
    fn test_copy_decision(#[case] replica_time: Option<u64>, #[case] expect_copy: bool) {
        let source = snapshot("/src", &[("a.txt", 10)]);
        let replica_entries: Vec<(&str, u64)> =
            replica_time.map(|t| ("a.txt", t)).into_iter().collect();
        let replica = snapshot("/dst", &replica_entries);

        let actions = plan(&source, &replica);
        let expected = if expect_copy {
            vec![SyncAction::Copy(PathBuf::from("a.txt"))]
        } else {
            Vec::new()
        };
        assert_eq!(actions, expected);
    }

    #[test]
    fn test_plan_orders_deletes_before_copies() {
        let source = snapshot("/src", &[("b.txt", 1), ("a.txt", 1), ("same.txt", 3)]);
        let replica = snapshot("/dst", &[("z.txt", 1), ("same.txt", 3), ("old.txt", 1)]);

        assert_eq!(
            plan(&source, &replica),
            vec![
                SyncAction::Delete(PathBuf::from("old.txt")),
                SyncAction::Delete(PathBuf::from("z.txt")),
                SyncAction::Copy(PathBuf::from("a.txt")),
                SyncAction::Copy(PathBuf::from("b.txt")),
            ]
        );
    }

    #[test]
    fn test_plan_empty_trees() {
        assert!(plan(&snapshot("/src", &[]), &snapshot("/dst", &[])).is_empty());
    }

    #[test]
    fn test_apply_copies_into_missing_directories() {
        let fs = MemoryFs::new();
        fs.add_file("/src/deep/nested/a.txt", "hello", at(7));
        fs.add_dir("/dst");

        let source = snapshot("/src", &[("deep/nested/a.txt", 7)]);
        let replica = snapshot("/dst", &[]);
        let reporter = MemoryReporter::new();

        let report = apply(&plan(&source, &replica), &source, &replica, &fs, &reporter);

        assert_eq!(report.copied, 1);
        let copy = fs.file("/dst/deep/nested/a.txt").unwrap();
        assert_eq!(copy.content, b"hello");
        assert_eq!(copy.modified, at(7));
        assert_eq!(
            reporter.events(),
            vec![ReportEvent::Copied(PathBuf::from("/dst/deep/nested/a.txt"))]
        );
    }

    #[test]
    fn test_apply_isolates_failures() {
        let fs = MemoryFs::new();
        fs.add_file("/src/locked.txt", "x", at(1));
        fs.add_file("/src/fine.txt", "y", at(1));
        fs.add_file("/dst/stuck.txt", "old", at(1));
        fs.add_file("/dst/orphan.txt", "old", at(1));
        fs.deny("/dst/locked.txt");
        fs.deny("/dst/stuck.txt");

        let source = snapshot("/src", &[("locked.txt", 1), ("fine.txt", 1)]);
        let replica = snapshot("/dst", &[("stuck.txt", 1), ("orphan.txt", 1)]);
        let reporter = MemoryReporter::new();

        let actions = plan(&source, &replica);
        let report = apply(&actions, &source, &replica, &fs, &reporter);

        assert_eq!(
            report,
            ApplyReport {
                copied: 1,
                removed: 1,
                failed: 2
            }
        );
        assert_eq!(report.total(), actions.len());
        assert!(fs.file("/dst/fine.txt").is_some());
        assert!(fs.file("/dst/orphan.txt").is_none());
        assert_eq!(
            reporter.failures(),
            vec![
                ReportEvent::RemoveFailed(PathBuf::from("/dst/stuck.txt")),
                ReportEvent::CopyFailed(PathBuf::from("/dst/locked.txt")),
            ]
        );
    }

    #[test]
    fn test_apply_replaces_directory_of_orphans_with_file() {
        let fs = MemoryFs::new();
        fs.add_file("/src/clash", "file", at(2));
        fs.add_file("/dst/clash/old.txt", "stale", at(1));

        let source = snapshot("/src", &[("clash", 2)]);
        let replica = snapshot("/dst", &[("clash/old.txt", 1)]);
        let reporter = MemoryReporter::new();

        let report = apply(&plan(&source, &replica), &source, &replica, &fs, &reporter);

        assert_eq!(
            report,
            ApplyReport {
                copied: 1,
                removed: 1,
                failed: 0
            }
        );
        assert!(!fs.is_dir("/dst/clash"));
        assert_eq!(fs.file("/dst/clash").unwrap().content, b"file");
    }

    #[test]
    fn test_apply_reports_copy_over_non_empty_directory() {
        let fs = MemoryFs::new();
        fs.add_file("/src/clash", "file", at(2));
        fs.add_file("/dst/clash/stuck.txt", "stale", at(1));
        fs.deny("/dst/clash/stuck.txt");

        let source = snapshot("/src", &[("clash", 2)]);
        let replica = snapshot("/dst", &[("clash/stuck.txt", 1)]);
        let reporter = MemoryReporter::new();

        let report = apply(&plan(&source, &replica), &source, &replica, &fs, &reporter);

        assert_eq!(report.failed, 2);
        assert_eq!(
            reporter.failures(),
            vec![
                ReportEvent::RemoveFailed(PathBuf::from("/dst/clash/stuck.txt")),
                ReportEvent::CopyFailed(PathBuf::from("/dst/clash")),
            ]
        );
    }

    #[test]
    fn test_action_display() {
        assert_eq!(SyncAction::Copy(PathBuf::from("a")).to_string(), "copy a");
        assert_eq!(SyncAction::Delete(PathBuf::from("b")).to_string(), "delete b");
        assert_eq!(SyncAction::Delete(PathBuf::from("b")).path(), Path::new("b"));
    }
}
