//! Configuration types for chatlog.
//!
//! `ChatlogConfig` represents the optional `config.toml` in the data
//! directory. Every field has a default, so an empty file is valid.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatlogConfig {
    /// Binary history file used by save and load.
    ///
    /// Relative paths are resolved against the working directory.
    #[serde(default = "default_history_file")]
    pub history_file: PathBuf,

    /// `chrono` format string for displaying timestamps in local time.
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,

    /// Load the history file when the interactive menu starts.
    #[serde(default)]
    pub load_on_start: bool,

    /// Save the history file when the interactive menu exits.
    #[serde(default)]
    pub save_on_exit: bool,
}

fn default_history_file() -> PathBuf {
    PathBuf::from("chat_history.dat")
}

fn default_timestamp_format() -> String {
    "%Y-%m-%d %H:%M:%S".to_string()
}

impl Default for ChatlogConfig {
    fn default() -> Self {
        Self {
            history_file: default_history_file(),
            timestamp_format: default_timestamp_format(),
            load_on_start: false,
            save_on_exit: false,
        }
    }
}
