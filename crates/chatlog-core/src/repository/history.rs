//! HistoryStore trait definition.
//!
//! Persists the ordered log as a flat sequence of messages. Undo/redo state
//! is never persisted: a restored log starts with every message undoable and
//! nothing to redo.

use chatlog_types::error::StorageError;
use chatlog_types::message::Message;

/// Storage port for the message log.
///
/// Implementations live in chatlog-infra (e.g., `HistoryFile`).
/// Calls are synchronous and block until the underlying I/O completes.
pub trait HistoryStore {
    /// Persist `messages` in iteration order, replacing any previous contents.
    ///
    /// Returns the number of messages written.
    fn save<'a, I>(&self, messages: I) -> Result<usize, StorageError>
    where
        I: IntoIterator<Item = &'a Message>;

    /// Read back every stored message, oldest first.
    ///
    /// Returns [`StorageError::NoSaveFile`] when the source cannot be opened.
    fn load(&self) -> Result<Vec<Message>, StorageError>;

    /// Like [`load`](Self::load), but fails with [`StorageError::Unreadable`]
    /// where `load` would return a shortened or empty result.
    ///
    /// `NoSaveFile` is still returned when the source does not exist. Use
    /// this before rewriting the store from what was read.
    fn load_exact(&self) -> Result<Vec<Message>, StorageError> {
        self.load()
    }
}
