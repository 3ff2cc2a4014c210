// src/watch/path_utils.rs

//! Utility functions for showing changed paths in log output.

use std::path::{Path, PathBuf};

/// Render `path` relative to `base` for log output.
///
/// - First we try a direct `strip_prefix(base)`.
/// - If that fails (e.g. due to symlinks or different absolute prefixes),
///   we canonicalize both paths and try again.
/// - Otherwise the path is shown as-is.
pub fn relative_display(base: &Path, path: &Path) -> String {
    if let Ok(rel) = path.strip_prefix(base) {
        return display_rel(rel);
    }

    // Helps on platforms (notably macOS) where the same directory can be
    // reached through different absolute prefixes (/private/var/...).
    if let (Ok(base_canon), Ok(path_canon)) = (base.canonicalize(), path.canonicalize()) {
        if let Ok(rel) = path_canon.strip_prefix(&base_canon) {
            return display_rel(rel);
        }
    }

    path.display().to_string()
}

/// Comma separated list of [`relative_display`] renderings.
pub fn join_relative(base: &Path, paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| relative_display(base, p))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Current working directory, or `.` if it can't be determined.
pub fn current_dir_or_dot() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn display_rel(rel: &Path) -> String {
    if rel.as_os_str().is_empty() {
        ".".to_string()
    } else {
        rel.display().to_string()
    }
}
