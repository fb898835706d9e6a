//! Key and path utilities

use std::path::{Path, PathBuf};

/// Convert absolute path to relative path from base
pub fn path_relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    path.strip_prefix(base).ok().map(|p| p.to_path_buf())
}

/// Object key for a relative path: components joined with `/` on every platform.
pub fn path_to_object_key(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// True when `key` ends with `extension`, ignoring case.
pub fn has_extension(key: &str, extension: &str) -> bool {
    key.to_lowercase().ends_with(&extension.to_lowercase())
}

/// OS metadata files that never represent uploaded objects (skipped by `--scan`).
pub fn is_os_hidden_file(path: &Path) -> bool {
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        match name {
            // macOS
            ".DS_Store" | ".AppleDouble" | ".LSOverride" => true,
            // Windows
            "Thumbs.db" | "ehthumbs.db" | "Desktop.ini" => true,
            // Linux
            ".directory" => true,
            // macOS resource forks
            _ => name.starts_with("._"),
        }
    } else {
        false
    }
}
