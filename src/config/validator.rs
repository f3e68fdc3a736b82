use crate::error::ConfigError;
use std::path::{Component, Path, PathBuf};

/// Check that the source and replica roots can be mirrored safely.
///
/// Roots are compared after resolving them to absolute paths, following symlinks in
/// the part of each path that already exists.
///
/// # Errors
///
/// Returns an error if:
/// - Either path cannot be resolved
/// - Both paths name the same directory
/// - One path lies inside the other
pub fn validate_roots(source: &Path, replica: &Path) -> Result<(), ConfigError> {
    let source_abs = resolve(source)?;
    let replica_abs = resolve(replica)?;

    if source_abs == replica_abs {
        return Err(ConfigError::SameRoot { path: source_abs });
    }
    if replica_abs.starts_with(&source_abs) {
        return Err(ConfigError::NestedRoot {
            inner: replica_abs,
            outer: source_abs,
        });
    }
    if source_abs.starts_with(&replica_abs) {
        return Err(ConfigError::NestedRoot {
            inner: source_abs,
            outer: replica_abs,
        });
    }
    Ok(())
}

/// Absolute, normalized form of `path`, with its deepest existing ancestor canonicalized
fn resolve(path: &Path) -> Result<PathBuf, ConfigError> {
    let absolute = std::path::absolute(path).map_err(|source| ConfigError::Resolve {
        path: path.to_path_buf(),
        source,
    })?;
    let absolute = normalize(&absolute);

    for ancestor in absolute.ancestors() {
        if let Ok(canonical) = ancestor.canonicalize() {
            let rest = absolute.strip_prefix(ancestor).unwrap_or(Path::new(""));
            return Ok(canonical.join(rest));
        }
    }
    Ok(absolute)
}

/// Lexically drop `.` components and fold `..` into their parent
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
