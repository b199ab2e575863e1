//! Application state shared by every command.
//!
//! AppState resolves the data directory, loads `config.toml` and pins the
//! history store to the binary file implementation.

use std::path::Path;

use chatlog_infra::config::{load_config, resolve_history_file};
use chatlog_infra::filesystem::resolve_data_dir;
use chatlog_infra::storage::HistoryFile;
use chatlog_types::config::ChatlogConfig;

pub struct AppState {
    pub config: ChatlogConfig,
    pub store: HistoryFile,
}

impl AppState {
    /// Resolve configuration and the history file path.
    ///
    /// `file_override` (the `--file` flag) takes precedence over `config.toml`.
    pub fn init(file_override: Option<&Path>) -> Self {
        let data_dir = resolve_data_dir();
        let config = load_config(&data_dir);
        let store = HistoryFile::new(resolve_history_file(&config, file_override));

        tracing::debug!(
            data_dir = %data_dir.display(),
            history_file = %store.path().display(),
            "application state initialized"
        );

        Self { config, store }
    }
}
