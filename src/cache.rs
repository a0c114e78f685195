use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheReset {
    Deleted,
    Missing,
    Failed,
}

/// Delete the module cache tree before a run. Failures are logged, never returned.
pub fn reset_cache(dir: &Path) -> CacheReset {
    match fs::remove_dir_all(dir) {
        Ok(()) => {
            info!("Directory '{}' deleted successfully.", dir.display());
            CacheReset::Deleted
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("Directory '{}' does not exist.", dir.display());
            CacheReset::Missing
        }
        Err(e) => {
            warn!("Failed to delete '{}': {}", dir.display(), e);
            CacheReset::Failed
        }
    }
}

/// Anchor `path` at the current directory when relative, then fold it.
///
/// Relative and absolute spellings of one directory compare equal afterwards.
pub fn absolute_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return normalize_path(path);
    }
    match std::env::current_dir() {
        Ok(cwd) => normalize_path(&cwd.join(path)),
        Err(e) => {
            warn!("Cannot resolve current directory, comparing {} as given: {}", path.display(), e);
            normalize_path(path)
        }
    }
}

/// Fold `.` and `..` components without touching the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        out
    }
}
