//! Configuration loader for chatlog.
//!
//! Reads `config.toml` from the data directory (`~/.chatlog/` by default)
//! and deserializes it into [`ChatlogConfig`]. Falls back to defaults when
//! the file is missing or malformed.

use std::path::{Path, PathBuf};

use chatlog_types::config::ChatlogConfig;

use crate::filesystem::config_path;

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`ChatlogConfig::default()`].
/// - If the file exists but cannot be read or parsed, logs a warning and returns the default.
/// - Otherwise returns the parsed config.
pub fn load_config(data_dir: &Path) -> ChatlogConfig {
    let path = config_path(data_dir);

    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", path.display());
            return ChatlogConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return ChatlogConfig::default();
        }
    };

    match toml::from_str::<ChatlogConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            ChatlogConfig::default()
        }
    }
}

/// Resolve the history file path.
///
/// Priority:
/// 1. `--file` flag
/// 2. `history_file` from `config.toml` (or its default)
pub fn resolve_history_file(config: &ChatlogConfig, cli_override: Option<&Path>) -> PathBuf {
    cli_override
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.history_file.clone())
}
