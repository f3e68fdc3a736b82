use super::FileSystem;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

/// A file held by [`MemoryFs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryFile {
    /// File content
    pub content: Vec<u8>,
    /// Last modification time
    pub modified: SystemTime,
    /// Permission bits
    pub mode: u32,
}

/// Mutable state behind the [`MemoryFs`] lock.
#[derive(Debug, Default)]
struct MemoryState {
    /// Regular files keyed by absolute path
    files: BTreeMap<PathBuf, MemoryFile>,
    /// Existing directories
    dirs: BTreeSet<PathBuf>,
    /// Paths (and everything below them) that refuse every operation
    denied: BTreeSet<PathBuf>,
    /// Destinations written by `copy_file`, in order
    writes: Vec<PathBuf>,
}

impl MemoryState {
    /// Fail with `PermissionDenied` if `path` is at or below a denied path.
    fn check_access(&self, path: &Path) -> io::Result<()> {
        if self.denied.iter().any(|denied| path.starts_with(denied)) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("permission denied: {}", path.display()),
            ));
        }
        Ok(())
    }
}

/// In-memory directory tree for exercising the engine without touching disk.
///
/// Paths are used verbatim; callers should stick to absolute paths such as
/// `/source/a.txt`. Any path registered with [`MemoryFs::deny`] fails every
/// operation with `PermissionDenied`, which is how tests inject I/O failures.
#[derive(Debug, Default)]
pub struct MemoryFs {
    /// Shared tree state
    state: Mutex<MemoryState>,
}

impl MemoryFs {
    /// Create an empty tree
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the state, recovering from poisoning (the state stays consistent per call)
    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a directory and all of its ancestors
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut state = self.state();
        for ancestor in path.as_ref().ancestors() {
            if !ancestor.as_os_str().is_empty() {
                state.dirs.insert(ancestor.to_path_buf());
            }
        }
    }

    /// Add (or replace) a file, creating its parent directories
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>, modified: SystemTime) {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            self.add_dir(parent);
        }
        self.state().files.insert(
            path.to_path_buf(),
            MemoryFile {
                content: content.into(),
                modified,
                mode: 0o644,
            },
        );
    }

    /// Make every operation on `path`, or anything below it, fail
    pub fn deny(&self, path: impl AsRef<Path>) {
        self.state().denied.insert(path.as_ref().to_path_buf());
    }

    /// Look up a file
    #[must_use]
    pub fn file(&self, path: impl AsRef<Path>) -> Option<MemoryFile> {
        self.state().files.get(path.as_ref()).cloned()
    }

    /// Check whether a directory exists
    #[must_use]
    pub fn is_dir(&self, path: impl AsRef<Path>) -> bool {
        self.state().dirs.contains(path.as_ref())
    }

    /// Destinations written by `copy_file` so far
    #[must_use]
    pub fn writes(&self) -> Vec<PathBuf> {
        self.state().writes.clone()
    }
}

impl FileSystem for MemoryFs {
    fn walk_files(&self, root: &Path) -> io::Result<Vec<PathBuf>> {
        let state = self.state();
        state.check_access(root)?;
        if !state.dirs.contains(root) {
            let kind = if state.files.contains_key(root) {
                io::ErrorKind::NotADirectory
            } else {
                io::ErrorKind::NotFound
            };
            return Err(io::Error::new(kind, root.display().to_string()));
        }

        Ok(state
            .files
            .keys()
            .filter(|path| path.starts_with(root) && state.check_access(path).is_ok())
            .cloned()
            .collect())
    }

    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        let state = self.state();
        state.check_access(path)?;
        state
            .files
            .get(path)
            .map(|file| file.modified)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }

    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        let mut state = self.state();
        state.check_access(from)?;
        state.check_access(to)?;

        let file = state
            .files
            .get(from)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, from.display().to_string()))?;
        if state.dirs.contains(to) {
            if state.files.keys().any(|path| path.starts_with(to)) {
                return Err(io::Error::new(
                    io::ErrorKind::DirectoryNotEmpty,
                    to.display().to_string(),
                ));
            }
            state.dirs.retain(|dir| !dir.starts_with(to));
        }
        if let Some(parent) = to.parent() {
            if !state.dirs.contains(parent) {
                return Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    parent.display().to_string(),
                ));
            }
        }

        state.files.insert(to.to_path_buf(), file);
        state.writes.push(to.to_path_buf());
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        let mut state = self.state();
        state.check_access(path)?;
        state
            .files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut state = self.state();
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() || state.dirs.contains(ancestor) {
                continue;
            }
            state.check_access(ancestor)?;
            if state.files.contains_key(ancestor) {
                return Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    ancestor.display().to_string(),
                ));
            }
        }
        for ancestor in path.ancestors() {
            if !ancestor.as_os_str().is_empty() {
                state.dirs.insert(ancestor.to_path_buf());
            }
        }
        Ok(())
    }
}
