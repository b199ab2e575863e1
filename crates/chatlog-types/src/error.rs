use std::path::PathBuf;

use thiserror::Error;

/// Errors from the ordered log container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LogError {
    #[error("log is empty")]
    Empty,
}

/// Non-fatal outcomes of undo and redo.
///
/// Both leave every structure unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("nothing to undo")]
    NothingToUndo,

    #[error("nothing to redo")]
    NothingToRedo,
}

impl From<LogError> for HistoryError {
    fn from(err: LogError) -> Self {
        match err {
            LogError::Empty => HistoryError::NothingToUndo,
        }
    }
}

/// Errors from persisting or restoring the log.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("cannot access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source could not be opened. Callers treat this as an empty history.
    #[error("no save file at '{}'", path.display())]
    NoSaveFile { path: PathBuf },

    /// The source exists but could not be read to the end.
    ///
    /// Only returned by exact loads; rewriting after a partial read would
    /// drop the unread records.
    #[error("cannot read '{}' completely: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
