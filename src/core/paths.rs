//! Path normalization utilities
//!
//! All rule matching and reporting happens on root-relative paths
//! normalized to '/' as separator.

use std::path::Path;

/// Normalize a path to use '/' as separator (for cross-platform consistency)
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Make a path relative to the root directory, normalized
pub fn make_relative(path: &Path, root: &Path) -> Option<String> {
    path.strip_prefix(root).ok().map(normalize_path)
}

/// Containing-folder label for a normalized relative path ('.' for the root)
pub fn folder_label(relative: &str) -> &str {
    match relative.rsplit_once('/') {
        Some((dir, _)) => dir,
        None => ".",
    }
}

/// Final path segment of a normalized relative path
pub fn file_name(relative: &str) -> &str {
    match relative.rsplit_once('/') {
        Some((_, name)) => name,
        None => relative,
    }
}

/// Lowercased extension of a file name, with the leading dot.
///
/// A dot that starts the name does not begin an extension, so
/// ".gitignore" has none; only the last dot counts, so "x.tar.gz"
/// yields ".gz".
pub fn file_extension(name: &str) -> String {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name[idx..].to_lowercase(),
        _ => String::new(),
    }
}
