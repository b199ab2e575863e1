//! Filesystem helpers for chatlog.
//!
//! Resolves the data directory that holds `config.toml`, and the history file
//! path relative to it.

use std::path::{Path, PathBuf};

/// Name of the configuration file inside the data directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `CHATLOG_DATA_DIR` environment variable
/// 2. `~/.chatlog`
/// 3. `.chatlog` in the working directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CHATLOG_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".chatlog");
    }

    PathBuf::from(".chatlog")
}

/// Path of `config.toml` inside `data_dir`.
pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE_NAME)
}
