use super::FileSystem;
use crate::utils::permissions::FilePermissions;
use filetime::FileTime;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::warn;
use walkdir::WalkDir;

/// The real, on-disk filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    /// Create a handle to the local filesystem
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

/// Clear a symlink or a directory holding no files out of a copy destination
fn clear_destination(to: &Path) -> io::Result<()> {
    match fs::symlink_metadata(to) {
        Ok(metadata) if metadata.file_type().is_symlink() => fs::remove_file(to),
        Ok(metadata) if metadata.is_dir() => remove_empty_tree(to),
        Ok(_) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err),
    }
}

/// Remove a directory tree that holds nothing but directories
fn remove_empty_tree(dir: &Path) -> io::Result<()> {
    let mut dirs = Vec::new();
    for entry in WalkDir::new(dir).follow_links(false).contents_first(true) {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::DirectoryNotEmpty,
                format!("{} is not empty", dir.display()),
            ));
        }
        dirs.push(entry.into_path());
    }
    dirs.iter().try_for_each(fs::remove_dir)
}

impl FileSystem for LocalFs {
    fn walk_files(&self, root: &Path) -> io::Result<Vec<PathBuf>> {
        if !fs::metadata(root)?.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                "not a directory",
            ));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(root).follow_links(false) {
            match entry {
                Ok(entry)
                    if entry.depth() > 0
                        && (entry.file_type().is_file() || entry.file_type().is_symlink()) =>
                {
                    files.push(entry.into_path());
                }
                Ok(_) => {}
                // Depth 0 is the root itself: the whole walk is meaningless without it
                Err(err) if err.depth() == 0 => {
                    return Err(err
                        .into_io_error()
                        .unwrap_or_else(|| io::Error::other("failed to read directory")));
                }
                Err(err) => {
                    let path = err
                        .path()
                        .map_or_else(|| root.display().to_string(), |p| p.display().to_string());
                    warn!("Skipping unreadable entry {path}: {err}");
                }
            }
        }

        Ok(files)
    }

    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        match fs::metadata(path) {
            Ok(metadata) => metadata.modified(),
            // Dangling link: fall back to the link itself
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                fs::symlink_metadata(path)?.modified()
            }
            Err(err) => Err(err),
        }
    }

    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        clear_destination(to)?;
        fs::copy(from, to)?;

        let metadata = fs::metadata(from)?;
        filetime::set_file_times(
            to,
            FileTime::from_last_access_time(&metadata),
            FileTime::from_last_modification_time(&metadata),
        )?;
        FilePermissions::from_metadata(&metadata).apply_to_path(to)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }
}
