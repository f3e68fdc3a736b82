//! Directory tree scanning.
//!
//! [`StateScanner`] walks a tree and captures a [`DirectorySnapshot`]: every regular
//! file's path relative to the root, mapped to its modification time. A snapshot is
//! built fresh each cycle and never updated afterwards.

use crate::error::ScanError;
use crate::fs::FileSystem;
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, warn};

/// Immutable view of one tree's files at scan time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorySnapshot {
    /// Root the relative paths are anchored at
    root: PathBuf,
    /// Relative path to modification time
    files: BTreeMap<PathBuf, SystemTime>,
}

impl DirectorySnapshot {
    /// Build a snapshot from already-known `(relative path, mtime)` pairs.
    pub fn from_entries(
        root: impl Into<PathBuf>,
        entries: impl IntoIterator<Item = (PathBuf, SystemTime)>,
    ) -> Self {
        Self {
            root: root.into(),
            files: entries.into_iter().collect(),
        }
    }

    /// Root directory of the scanned tree
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Modification time recorded for a relative path
    #[must_use]
    pub fn modified(&self, relative: &Path) -> Option<SystemTime> {
        self.files.get(relative).copied()
    }

    /// Whether a relative path was present at scan time
    #[must_use]
    pub fn contains(&self, relative: &Path) -> bool {
        self.files.contains_key(relative)
    }

    /// Re-root a relative path under this snapshot's root
    #[must_use]
    pub fn absolute(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }

    /// Iterate `(relative path, mtime)` in path order
    pub fn iter(&self) -> btree_map::Iter<'_, PathBuf, SystemTime> {
        self.files.iter()
    }

    /// Number of files
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the tree held no files
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl<'a> IntoIterator for &'a DirectorySnapshot {
    type Item = (&'a PathBuf, &'a SystemTime);
    type IntoIter = btree_map::Iter<'a, PathBuf, SystemTime>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Captures [`DirectorySnapshot`]s through a [`FileSystem`].
pub struct StateScanner<F> {
    /// Filesystem to read from
    fs: F,
}

impl<F: FileSystem> StateScanner<F> {
    /// Create a scanner over the given filesystem
    pub const fn new(fs: F) -> Self {
        Self { fs }
    }

    /// Snapshot every file and symlink under `root`.
    ///
    /// Entries that disappear or cannot be stat'ed between listing and reading their
    /// metadata are left out of the snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::DirectoryAccess`] if `root` is missing, not a directory, or
    /// unreadable.
    pub fn scan(&self, root: &Path) -> Result<DirectorySnapshot, ScanError> {
        let paths = self
            .fs
            .walk_files(root)
            .map_err(|source| ScanError::DirectoryAccess {
                path: root.to_path_buf(),
                source,
            })?;

        let mut files = BTreeMap::new();
        for path in paths {
            let Ok(relative) = path.strip_prefix(root) else {
                warn!("Ignoring {} outside of {}", path.display(), root.display());
                continue;
            };

            match self.fs.modified(&path) {
                Ok(mtime) => {
                    files.insert(relative.to_path_buf(), mtime);
                }
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    debug!("File vanished during scan: {}", path.display());
                }
                Err(err) => warn!("Cannot read modification time of {}: {err}", path.display()),
            }
        }

        debug!(root = %root.display(), files = files.len(), "Scanned directory");
        Ok(DirectorySnapshot {
            root: root.to_path_buf(),
            files,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFs;
    use std::time::{Duration, UNIX_EPOCH};

    fn at(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn test_scan_records_relative_paths() {
        let fs = MemoryFs::new();
        fs.add_file("/src/a.txt", "a", at(10));
        fs.add_file("/src/dir/b.txt", "b", at(20));
        fs.add_dir("/src/empty");

        let snapshot = StateScanner::new(&fs).scan(Path::new("/src")).unwrap();

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.modified(Path::new("a.txt")), Some(at(10)));
        assert_eq!(snapshot.modified(Path::new("dir/b.txt")), Some(at(20)));
        assert!(!snapshot.contains(Path::new("empty")));
        assert_eq!(
            snapshot.absolute(Path::new("dir/b.txt")),
            PathBuf::from("/src/dir/b.txt")
        );
    }

    #[test]
    fn test_scan_empty_root() {
        let fs = MemoryFs::new();
        fs.add_dir("/src");

        let snapshot = StateScanner::new(&fs).scan(Path::new("/src")).unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_scan_missing_root_is_directory_access_error() {
        let fs = MemoryFs::new();
        let err = StateScanner::new(&fs).scan(Path::new("/missing")).unwrap_err();

        let ScanError::DirectoryAccess { path, source } = err;
        assert_eq!(path, PathBuf::from("/missing"));
        assert_eq!(source.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_scan_denied_root_is_directory_access_error() {
        let fs = MemoryFs::new();
        fs.add_file("/src/a.txt", "a", at(1));
        fs.deny("/src");

        assert!(StateScanner::new(&fs).scan(Path::new("/src")).is_err());
    }

    #[test]
    fn test_scan_skips_unreadable_subtree() {
        let fs = MemoryFs::new();
        fs.add_file("/src/a.txt", "a", at(1));
        fs.add_file("/src/private/b.txt", "b", at(1));
        fs.deny("/src/private");

        let snapshot = StateScanner::new(&fs).scan(Path::new("/src")).unwrap();
        assert!(snapshot.contains(Path::new("a.txt")));
        assert!(!snapshot.contains(Path::new("private/b.txt")));
    }
}
