//! Message history with undo/redo of appends.
//!
//! [`ChatHistory`] is the single owning handle for the log, the undo and
//! redo stacks, and the arena holding the messages they reference.

pub mod controller;
pub mod view;

pub use controller::ChatHistory;
pub use view::{HistoryEntry, HistoryView, LoadOutcome, SendReceipt};
