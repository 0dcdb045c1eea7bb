//! Path utilities for locating persisted data.
//!
//! Data lives under `$XDG_DATA_HOME/tree-explorer`, falling back to
//! `$HOME/.local/share/tree-explorer`, and finally to `./.tree-explorer` when
//! neither variable is set.

use std::path::{Path, PathBuf};

/// Directory name used under the platform data directory.
pub const APP_DIR_NAME: &str = "tree-explorer";

/// File name of the default JSON store.
pub const STORE_FILE_NAME: &str = "trees.json";

/// Returns the data directory for tree explorer storage.
///
/// # Examples
///
/// ```
/// use tree_explorer::infrastructure::get_data_dir;
///
/// assert!(get_data_dir().ends_with("tree-explorer") || get_data_dir().ends_with(".tree-explorer"));
/// ```
#[must_use]
pub fn get_data_dir() -> PathBuf {
    data_dir_from(
        std::env::var_os("XDG_DATA_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

/// Resolves the data directory from explicit environment values.
#[must_use]
pub fn data_dir_from(xdg_data_home: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    if let Some(xdg) = xdg_data_home.filter(|p| p.is_absolute()) {
        return xdg.join(APP_DIR_NAME);
    }
    if let Some(home) = home.filter(|p| !p.as_os_str().is_empty()) {
        return home.join(".local").join("share").join(APP_DIR_NAME);
    }
    PathBuf::from(format!(".{APP_DIR_NAME}"))
}

/// Default location of the JSON store.
#[must_use]
pub fn default_store_path() -> PathBuf {
    get_data_dir().join(STORE_FILE_NAME)
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading `~`, or any path when `HOME` is unset, are
/// returned unchanged.
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    expand_tilde_with(path, std::env::var_os("HOME").as_deref().map(Path::new))
}

fn expand_tilde_with(path: &str, home: Option<&Path>) -> PathBuf {
    match (path.strip_prefix('~'), home) {
        (Some(""), Some(home)) => home.to_path_buf(),
        (Some(rest), Some(home)) if rest.starts_with('/') => home.join(&rest[1..]),
        _ => PathBuf::from(path),
    }
}
