#![allow(dead_code)]

use anyhow::Result;
use dirmirror::daemon::Daemon;
use dirmirror::fs::LocalFs;
use dirmirror::output::MemoryReporter;
use filetime::FileTime;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tempfile::TempDir;

/// A source/replica pair inside a temporary directory
pub struct MirrorTrees {
    pub temp_dir: TempDir,
    pub source: PathBuf,
    pub replica: PathBuf,
}

impl MirrorTrees {
    /// Create both roots
    pub fn new() -> Result<Self> {
        let trees = Self::uncreated()?;
        fs::create_dir_all(&trees.source)?;
        fs::create_dir_all(&trees.replica)?;
        Ok(trees)
    }

    /// Pick root paths without creating them
    pub fn uncreated() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let source = temp_dir.path().join("source");
        let replica = temp_dir.path().join("nested/replica");
        Ok(Self {
            temp_dir,
            source,
            replica,
        })
    }

    /// Write a source file with a fixed modification time (unix seconds)
    pub fn write_source(&self, relative: &str, content: &str, mtime: i64) -> Result<PathBuf> {
        write_with_mtime(&self.source.join(relative), content, mtime)
    }

    /// Write a replica file with a fixed modification time (unix seconds)
    pub fn write_replica(&self, relative: &str, content: &str, mtime: i64) -> Result<PathBuf> {
        write_with_mtime(&self.replica.join(relative), content, mtime)
    }

    /// Content of a replica file
    pub fn read_replica(&self, relative: &str) -> Result<String> {
        Ok(fs::read_to_string(self.replica.join(relative))?)
    }

    /// Daemon over the real filesystem reporting into `reporter`
    pub fn daemon<'a>(&self, reporter: &'a MemoryReporter) -> Daemon<LocalFs, &'a MemoryReporter> {
        Daemon::new(self.source.clone(), self.replica.clone(), LocalFs::new(), reporter)
    }
}

/// Write `content` to `path`, creating parents, then pin its mtime
pub fn write_with_mtime(path: &Path, content: &str, mtime: i64) -> Result<PathBuf> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    filetime::set_file_mtime(path, FileTime::from_unix_time(mtime, 0))?;
    Ok(path.to_path_buf())
}

/// Modification time of a file
pub fn mtime(path: &Path) -> Result<SystemTime> {
    Ok(fs::metadata(path)?.modified()?)
}

/// Whether permission bits are enforced for the current user (false when running as root)
#[cfg(unix)]
pub fn permissions_enforced(dir: &Path) -> bool {
    fs::write(dir.join(".write-check"), "x").is_err()
}
