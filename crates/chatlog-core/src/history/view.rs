//! Result and display types returned by [`ChatHistory`](super::ChatHistory).

use chatlog_types::message::MessageText;
use serde::Serialize;

use crate::arena::MessageId;

/// Acknowledgement of a successful send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendReceipt {
    /// Handle of the newly appended message.
    pub id: MessageId,
    /// Whether the input text was cut to fit the message bound.
    pub truncated: bool,
}

/// Outcome of restoring the log from a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoadOutcome {
    /// The store was read; `count` messages are now in the log.
    Loaded { count: usize },
    /// The store could not be opened. The history is empty.
    NoSaveFile,
}

/// One line of the history listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    /// 1-based position, oldest first.
    pub index: usize,
    /// Seconds since the Unix epoch.
    pub created_at: i64,
    pub text: MessageText,
}

/// Snapshot of the log for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "entries", rename_all = "snake_case")]
pub enum HistoryView {
    /// The log holds no messages.
    Empty,
    /// Messages oldest to newest.
    Entries(Vec<HistoryEntry>),
}

impl HistoryView {
    pub fn is_empty(&self) -> bool {
        matches!(self, HistoryView::Empty)
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        match self {
            HistoryView::Empty => &[],
            HistoryView::Entries(entries) => entries,
        }
    }
}
