//! Path helpers shared by the database index and the flag transformer.

use std::path::{Component, Path, PathBuf};

/// Lexically fold `.` and `..` components without touching the filesystem.
///
/// `..` at the root stays at the root.
pub fn normalize(path: &Path) -> PathBuf {
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
    out
}

/// Resolve `path` against `base` into a canonical absolute path.
///
/// Existing targets are canonicalized (symlinks resolved); others are
/// normalized lexically. Absolute inputs are still normalized.
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    canonical_or_normalized(&joined)
}

/// `fs::canonicalize` when the path exists, lexical normalization otherwise.
pub fn canonical_or_normalized(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| normalize(path))
}
