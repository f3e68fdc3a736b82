//! Filesystem capability used by the scanner and reconciler.
//!
//! Everything the mirroring engine does to disk goes through [`FileSystem`], so the
//! engine can run against [`LocalFs`] in production and [`MemoryFs`] in tests.

mod local;
mod memory;

pub use local::LocalFs;
pub use memory::{MemoryFile, MemoryFs};

use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Narrow set of filesystem operations needed to mirror a tree.
pub trait FileSystem {
    /// List every file below `root`, recursively.
    ///
    /// Regular files and symbolic links are returned. Directories are traversed but not
    /// returned, and links are never followed.
    ///
    /// # Errors
    ///
    /// Returns an error only when `root` itself is missing, not a directory, or
    /// unreadable. Unreadable entries below the root are skipped.
    fn walk_files(&self, root: &Path) -> io::Result<Vec<PathBuf>>;

    /// Last modification time of a file, taken from a link's target when it has one.
    ///
    /// # Errors
    ///
    /// Returns an error if the file metadata cannot be read
    fn modified(&self, path: &Path) -> io::Result<SystemTime>;

    /// Copy `from` over `to`, carrying over the modification time and permission bits.
    ///
    /// The parent of `to` must already exist. A symlink, or a directory tree holding no
    /// files, sitting at `to` is replaced; a link's target is never written through.
    ///
    /// # Errors
    ///
    /// Returns an error if reading, writing or updating metadata fails
    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Remove a single file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be removed
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Create a directory and all missing parents. Succeeds if it already exists.
    ///
    /// # Errors
    ///
    /// Returns an error if any component cannot be created
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}

impl<T: FileSystem + ?Sized> FileSystem for &T {
    fn walk_files(&self, root: &Path) -> io::Result<Vec<PathBuf>> {
        (**self).walk_files(root)
    }

    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        (**self).modified(path)
    }

    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        (**self).copy_file(from, to)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        (**self).remove_file(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        (**self).create_dir_all(path)
    }
}
