//! Undo/redo controller over the ordered message log.
//!
//! `ChatHistory` owns the message arena, the ordered log and the two stacks.
//! A message is held either by the log (with a back-reference on the undo
//! stack) or by the redo stack alone:
//!
//! ```text
//! send:  new message  -> log tail + undo top      (redo stack cleared)
//! undo:  log tail     -> redo top                 (undo top discarded)
//! redo:  redo top     -> log tail + undo top
//! ```
//!
//! Undo always removes the log tail and redo re-appends at the tail with the
//! message's original timestamp. After interleaved undo/redo/send the log is
//! in insertion order, which need not be timestamp order.

use chatlog_types::error::{HistoryError, StorageError};
use chatlog_types::message::{Message, MessageText};
use tracing::{debug, info};

use crate::arena::{MessageArena, MessageId};
use crate::log::OrderedLog;
use crate::repository::history::HistoryStore;

use super::view::{HistoryEntry, HistoryView, LoadOutcome, SendReceipt};

/// Owning handle for the message log and its undo/redo state.
///
/// Every mutating operation takes `&mut self`; share it across threads only
/// behind an external lock.
#[derive(Debug, Default)]
pub struct ChatHistory {
    arena: MessageArena,
    log: OrderedLog<MessageId>,
    undo_stack: Vec<MessageId>,
    redo_stack: Vec<MessageId>,
}

impl ChatHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new message stamped with the current time.
    ///
    /// Clears the redo stack. Overlong text is truncated silently; the
    /// receipt reports whether that happened.
    pub fn send(&mut self, text: &str) -> SendReceipt {
        let (text, truncated) = MessageText::normalize(text);
        self.send_message(Message::now(text), truncated)
    }

    /// Like [`send`](Self::send) with an explicit creation time.
    pub fn send_at(&mut self, text: &str, created_at: i64) -> SendReceipt {
        let (text, truncated) = MessageText::normalize(text);
        self.send_message(Message::new(text, created_at), truncated)
    }

    fn send_message(&mut self, message: Message, truncated: bool) -> SendReceipt {
        let id = self.record(message);
        let discarded = self.clear_redo();
        debug!(%id, truncated, discarded, "message sent");
        SendReceipt { id, truncated }
    }

    /// Remove the newest message from the log and make it redoable.
    pub fn undo(&mut self) -> Result<MessageId, HistoryError> {
        let id = self.log.remove_last()?;
        let back_ref = self.undo_stack.pop();
        debug_assert_eq!(back_ref, Some(id), "undo stack out of step with log");
        self.redo_stack.push(id);
        debug!(%id, redo_depth = self.redo_stack.len(), "undo");
        Ok(id)
    }

    /// Re-append the most recently undone message as the newest entry.
    pub fn redo(&mut self) -> Result<MessageId, HistoryError> {
        let id = self.redo_stack.pop().ok_or(HistoryError::NothingToRedo)?;
        self.log.append(id);
        self.undo_stack.push(id);
        debug!(%id, redo_depth = self.redo_stack.len(), "redo");
        Ok(id)
    }

    /// Messages in the log, oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Message> + '_ {
        self.log.iter().filter_map(|id| self.arena.get(*id))
    }

    /// Look up a message by handle, whether it is in the log or on the redo stack.
    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.arena.get(id)
    }

    /// Numbered listing of the log for display.
    pub fn view(&self) -> HistoryView {
        if self.log.is_empty() {
            return HistoryView::Empty;
        }
        let entries = self
            .iter()
            .enumerate()
            .map(|(i, message)| HistoryEntry {
                index: i + 1,
                created_at: message.created_at(),
                text: message.text().clone(),
            })
            .collect();
        HistoryView::Entries(entries)
    }

    /// Number of messages in the log.
    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.log.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// The message the next undo would remove.
    pub fn peek_undo(&self) -> Option<&Message> {
        self.log.last().and_then(|id| self.arena.get(*id))
    }

    /// The message the next redo would restore.
    pub fn peek_redo(&self) -> Option<&Message> {
        self.redo_stack.last().and_then(|id| self.arena.get(*id))
    }

    /// Number of messages held across the log and the redo stack.
    pub fn live_messages(&self) -> usize {
        self.arena.len()
    }

    /// Write the log to `store` in log order.
    pub fn save_to<S>(&self, store: &S) -> Result<usize, StorageError>
    where
        S: HistoryStore,
    {
        let written = store.save(self.iter())?;
        info!(written, "history saved");
        Ok(written)
    }

    /// Replace all state with the contents of `store`.
    ///
    /// State is cleared before reading, so a missing save file leaves the
    /// history empty rather than unchanged. Every restored message is
    /// undoable; the redo stack stays empty.
    pub fn load_from<S>(&mut self, store: &S) -> Result<LoadOutcome, StorageError>
    where
        S: HistoryStore,
    {
        let released = self.clear();
        debug!(released, "history cleared before load");
        self.restore(store.load())
    }

    /// Like [`load_from`](Self::load_from), but a partial or failed read is
    /// an error instead of a shorter history.
    ///
    /// Use this when the loaded log will be written back to the same store.
    pub fn load_exact_from<S>(&mut self, store: &S) -> Result<LoadOutcome, StorageError>
    where
        S: HistoryStore,
    {
        let released = self.clear();
        debug!(released, "history cleared before exact load");
        self.restore(store.load_exact())
    }

    fn restore(
        &mut self,
        loaded: Result<Vec<Message>, StorageError>,
    ) -> Result<LoadOutcome, StorageError> {
        match loaded {
            Ok(messages) => {
                let count = messages.len();
                for message in messages {
                    self.record(message);
                }
                info!(count, "history loaded");
                Ok(LoadOutcome::Loaded { count })
            }
            Err(StorageError::NoSaveFile { path }) => {
                info!(path = %path.display(), "no save file, starting empty");
                Ok(LoadOutcome::NoSaveFile)
            }
            Err(err) => Err(err),
        }
    }

    /// Release every message in the log and on both stacks.
    ///
    /// Returns the number of messages released. The history stays usable.
    pub fn clear(&mut self) -> usize {
        self.log.clear();
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.arena.clear()
    }

    /// Release all held messages at the end of a session.
    pub fn shutdown(&mut self) -> usize {
        let released = self.clear();
        info!(released, "history shut down");
        released
    }

    fn record(&mut self, message: Message) -> MessageId {
        let id = self.arena.insert(message);
        self.log.append(id);
        self.undo_stack.push(id);
        id
    }

    fn clear_redo(&mut self) -> usize {
        let mut discarded = 0;
        for id in self.redo_stack.drain(..) {
            if self.arena.remove(id).is_some() {
                discarded += 1;
            }
        }
        discarded
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::path::PathBuf;

    use super::*;
    use chatlog_types::message::MAX_TEXT_BYTES;

    fn texts(history: &ChatHistory) -> Vec<String> {
        history
            .iter()
            .map(|m| m.text().as_str().to_string())
            .collect()
    }

    fn assert_invariants(history: &ChatHistory) {
        assert_eq!(history.undo_depth(), history.len());
        assert_eq!(
            history.live_messages(),
            history.len() + history.redo_depth()
        );
    }

    /// In-memory store; `None` behaves like a missing save file.
    #[derive(Default)]
    struct MemoryStore {
        saved: RefCell<Option<Vec<Message>>>,
    }

    impl HistoryStore for MemoryStore {
        fn save<'a, I>(&self, messages: I) -> Result<usize, StorageError>
        where
            I: IntoIterator<Item = &'a Message>,
        {
            let messages: Vec<Message> = messages.into_iter().cloned().collect();
            let count = messages.len();
            *self.saved.borrow_mut() = Some(messages);
            Ok(count)
        }

        fn load(&self) -> Result<Vec<Message>, StorageError> {
            self.saved
                .borrow()
                .clone()
                .ok_or_else(|| StorageError::NoSaveFile {
                    path: PathBuf::from("memory"),
                })
        }
    }

    struct BrokenStore;

    impl HistoryStore for BrokenStore {
        fn save<'a, I>(&self, _messages: I) -> Result<usize, StorageError>
        where
            I: IntoIterator<Item = &'a Message>,
        {
            Err(StorageError::Io {
                path: PathBuf::from("broken"),
                source: std::io::Error::other("disk full"),
            })
        }

        fn load(&self) -> Result<Vec<Message>, StorageError> {
            Err(StorageError::Io {
                path: PathBuf::from("broken"),
                source: std::io::Error::other("unreadable"),
            })
        }
    }

    /// Returns the first record only, as if reading stopped on an I/O error.
    struct ShortReadStore;

    impl HistoryStore for ShortReadStore {
        fn save<'a, I>(&self, messages: I) -> Result<usize, StorageError>
        where
            I: IntoIterator<Item = &'a Message>,
        {
            Ok(messages.into_iter().count())
        }

        fn load(&self) -> Result<Vec<Message>, StorageError> {
            Ok(vec![Message::new(MessageText::new("first"), 1)])
        }

        fn load_exact(&self) -> Result<Vec<Message>, StorageError> {
            Err(StorageError::Unreadable {
                path: PathBuf::from("short"),
                source: std::io::Error::other("read failed after one record"),
            })
        }
    }

    #[test]
    fn test_exact_load_rejects_short_read() {
        let mut history = ChatHistory::new();
        assert_eq!(
            history.load_from(&ShortReadStore).unwrap(),
            LoadOutcome::Loaded { count: 1 }
        );

        history.send("stale");
        assert!(matches!(
            history.load_exact_from(&ShortReadStore),
            Err(StorageError::Unreadable { .. })
        ));
        assert!(history.is_empty());
        assert_eq!(history.live_messages(), 0);
    }

    #[test]
    fn test_exact_load_defaults_to_load() {
        let store = MemoryStore::default();
        let mut history = ChatHistory::new();
        assert_eq!(
            history.load_exact_from(&store).unwrap(),
            LoadOutcome::NoSaveFile
        );

        history.send_at("a", 1);
        history.save_to(&store).unwrap();
        assert_eq!(
            history.load_exact_from(&store).unwrap(),
            LoadOutcome::Loaded { count: 1 }
        );
        assert_eq!(texts(&history), vec!["a"]);
    }

    #[test]
    fn test_sends_iterate_in_order() {
        let mut history = ChatHistory::new();
        history.send("t1");
        history.send("t2");
        assert_eq!(texts(&history), vec!["t1", "t2"]);
        assert_invariants(&history);
    }

    #[test]
    fn test_undo_then_redo_round_trip() {
        let mut history = ChatHistory::new();
        history.send_at("first", 100);
        let before: Vec<Message> = history.iter().cloned().collect();

        history.send_at("second", 200);
        let after: Vec<Message> = history.iter().cloned().collect();

        history.undo().unwrap();
        assert_eq!(history.iter().cloned().collect::<Vec<_>>(), before);
        assert_invariants(&history);

        history.redo().unwrap();
        assert_eq!(history.iter().cloned().collect::<Vec<_>>(), after);
        assert_invariants(&history);
    }

    #[test]
    fn test_send_after_undo_clears_redo() {
        let mut history = ChatHistory::new();
        history.send("a");
        history.send("b");
        history.undo().unwrap();
        history.undo().unwrap();
        assert_eq!(history.redo_depth(), 2);

        history.send("c");
        assert_eq!(history.redo_depth(), 0);
        assert_eq!(history.redo(), Err(HistoryError::NothingToRedo));
        assert_invariants(&history);
    }

    #[test]
    fn test_send_frees_discarded_redo_messages() {
        let mut history = ChatHistory::new();
        history.send("a");
        let undone = history.undo().unwrap();
        assert!(history.get(undone).is_some());

        history.send("b");
        assert!(history.get(undone).is_none());
        assert_eq!(history.live_messages(), 1);
    }

    #[test]
    fn test_undo_on_empty_log() {
        let mut history = ChatHistory::new();
        assert_eq!(history.undo(), Err(HistoryError::NothingToUndo));
        assert!(history.is_empty());
        assert_eq!(history.undo_depth(), 0);
        assert_eq!(history.redo_depth(), 0);
    }

    #[test]
    fn test_undo_on_empty_log_keeps_redo_stack() {
        let mut history = ChatHistory::new();
        history.send("only");
        history.undo().unwrap();

        assert_eq!(history.undo(), Err(HistoryError::NothingToUndo));
        assert_eq!(history.redo_depth(), 1);
        assert_eq!(history.peek_redo().unwrap().text().as_str(), "only");
    }

    #[test]
    fn test_redo_on_empty_stack() {
        let mut history = ChatHistory::new();
        history.send("x");
        assert_eq!(history.redo(), Err(HistoryError::NothingToRedo));
        assert_eq!(texts(&history), vec!["x"]);
        assert_eq!(history.undo_depth(), 1);
        assert_eq!(history.redo_depth(), 0);
    }

    #[test]
    fn test_overlong_text_truncated_on_send() {
        let mut history = ChatHistory::new();
        let receipt = history.send(&"a".repeat(400));
        assert!(receipt.truncated);
        assert_eq!(history.get(receipt.id).unwrap().text().as_str().len(), MAX_TEXT_BYTES);

        let receipt = history.send("short");
        assert!(!receipt.truncated);
    }

    #[test]
    fn test_send_undo_send_scenario() {
        let mut history = ChatHistory::new();
        history.send("a");
        history.send("b");
        history.undo().unwrap();
        history.send("c");
        assert_eq!(texts(&history), vec!["a", "c"]);
        assert_eq!(history.redo(), Err(HistoryError::NothingToRedo));
        assert_invariants(&history);
    }

    #[test]
    fn test_redo_appends_at_tail_with_original_timestamp() {
        let mut history = ChatHistory::new();
        history.send_at("a", 10);
        history.send_at("b", 20);
        history.undo().unwrap();
        history.undo().unwrap();
        history.redo().unwrap();
        history.redo().unwrap();

        let stamps: Vec<i64> = history.iter().map(|m| m.created_at()).collect();
        assert_eq!(stamps, vec![10, 20]);

        // Undo and redo only ever touch the tail.
        history.undo().unwrap();
        history.undo().unwrap();
        history.redo().unwrap();
        assert_eq!(texts(&history), vec!["a"]);
        assert_eq!(history.peek_redo().unwrap().text().as_str(), "b");
    }

    #[test]
    fn test_view_reports_empty_distinctly() {
        let mut history = ChatHistory::new();
        assert_eq!(history.view(), HistoryView::Empty);

        history.send_at("one", 5);
        history.send_at("two", 6);
        let view = history.view();
        let entries = view.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].index, 1);
        assert_eq!(entries[0].created_at, 5);
        assert_eq!(entries[1].index, 2);
        assert_eq!(entries[1].text.as_str(), "two");
    }

    #[test]
    fn test_save_then_load_reconstructs_log() {
        let store = MemoryStore::default();
        let mut history = ChatHistory::new();
        history.send_at("a", 1);
        history.send_at("b", 2);
        history.send_at("c", 3);
        history.undo().unwrap();

        let saved: Vec<Message> = history.iter().cloned().collect();
        assert_eq!(history.save_to(&store).unwrap(), 2);

        let mut restored = ChatHistory::new();
        restored.send("stale");
        let outcome = restored.load_from(&store).unwrap();
        assert_eq!(outcome, LoadOutcome::Loaded { count: 2 });
        assert_eq!(restored.iter().cloned().collect::<Vec<_>>(), saved);
        assert_eq!(restored.redo_depth(), 0);
        assert_eq!(restored.undo_depth(), restored.len());
        assert_invariants(&restored);
    }

    #[test]
    fn test_load_missing_save_file_leaves_state_empty() {
        let store = MemoryStore::default();
        let mut history = ChatHistory::new();
        history.send("a");
        history.send("b");
        history.undo().unwrap();

        let outcome = history.load_from(&store).unwrap();
        assert_eq!(outcome, LoadOutcome::NoSaveFile);
        assert!(history.is_empty());
        assert_eq!(history.undo_depth(), 0);
        assert_eq!(history.redo_depth(), 0);
        assert_eq!(history.live_messages(), 0);
    }

    #[test]
    fn test_load_clears_redo_stack() {
        let store = MemoryStore::default();
        let mut history = ChatHistory::new();
        history.send("kept");
        history.save_to(&store).unwrap();

        history.send("undone");
        history.undo().unwrap();
        assert!(history.can_redo());

        history.load_from(&store).unwrap();
        assert!(!history.can_redo());
        assert_eq!(texts(&history), vec!["kept"]);
    }

    #[test]
    fn test_storage_errors_propagate() {
        let mut history = ChatHistory::new();
        history.send("a");
        assert!(matches!(
            history.save_to(&BrokenStore),
            Err(StorageError::Io { .. })
        ));
        assert!(matches!(
            history.load_from(&BrokenStore),
            Err(StorageError::Io { .. })
        ));
        assert!(history.is_empty());
    }

    #[test]
    fn test_shutdown_releases_everything() {
        let mut history = ChatHistory::new();
        history.send("a");
        history.send("b");
        history.send("c");
        history.undo().unwrap();

        assert_eq!(history.shutdown(), 3);
        assert!(history.is_empty());
        assert_eq!(history.live_messages(), 0);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_peek_matches_next_operation() {
        let mut history = ChatHistory::new();
        assert!(history.peek_undo().is_none());
        history.send("a");
        history.send("b");
        assert_eq!(history.peek_undo().unwrap().text().as_str(), "b");

        let id = history.undo().unwrap();
        assert_eq!(history.peek_redo(), history.get(id));
        assert_eq!(history.peek_undo().unwrap().text().as_str(), "a");
    }
}
