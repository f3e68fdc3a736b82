//! Error types for mirroring operations.
//!
//! Errors fall into two classes. [`ScanError`] and [`SyncError`] are fatal for the
//! current cycle and bubble out of [`crate::daemon::Daemon::run_cycle`]. [`ActionError`]
//! describes a single failed copy or delete. It is handed to the
//! [`crate::output::Reporter`] and never aborts a cycle. [`ConfigError`] rejects a
//! configuration before anything is touched on disk.

use std::io;
use std::path::PathBuf;

/// Result type for cycle-level operations
pub type Result<T> = std::result::Result<T, SyncError>;

/// A directory tree could not be scanned.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The tree root is missing, is not a directory, or cannot be read.
    #[error("Cannot access directory {}: {source}", path.display())]
    DirectoryAccess {
        /// Root of the tree being scanned
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// A single copy or delete action failed.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// Copying a source file over its replica counterpart failed.
    #[error(
        "Failed to synchronize file: {} -> {} - {source}",
        source_path.display(),
        replica_path.display()
    )]
    Copy {
        /// File in the source tree
        source_path: PathBuf,
        /// Destination in the replica tree
        replica_path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Removing an orphaned replica file failed.
    #[error("Failed to remove file from replica: {} - {source}", path.display())]
    Delete {
        /// File in the replica tree
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl ActionError {
    /// Path of the replica file the failed action targeted.
    #[must_use]
    pub fn replica_path(&self) -> &std::path::Path {
        match self {
            Self::Copy { replica_path, .. } => replica_path,
            Self::Delete { path, .. } => path,
        }
    }
}

/// Fatal errors surfaced by the orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// A root directory could not be created at startup.
    #[error("Failed to create directory {}: {source}", path.display())]
    Bootstrap {
        /// Directory that could not be created
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A tree scan failed, aborting the cycle.
    #[error(transparent)]
    Scan(#[from] ScanError),
}

/// The command-line configuration is unusable.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Source and replica resolve to the same directory.
    #[error("Source and replica are the same directory: {}", path.display())]
    SameRoot {
        /// The shared directory
        path: PathBuf,
    },

    /// One root lies inside the other, so the replica would be mirrored into itself.
    #[error("{} is nested inside {}", inner.display(), outer.display())]
    NestedRoot {
        /// The nested root
        inner: PathBuf,
        /// The root containing it
        outer: PathBuf,
    },

    /// A path could not be made absolute.
    #[error("Cannot resolve path {}: {source}", path.display())]
    Resolve {
        /// Path as given
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
}
