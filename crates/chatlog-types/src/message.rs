//! Message record types for chatlog.
//!
//! A [`Message`] is a timestamped text entry. Its text is a [`MessageText`],
//! which is always short enough to fit the fixed 256-byte on-disk field
//! (255 bytes of text plus a zero terminator).

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Size of the on-disk text field, terminator included.
pub const TEXT_FIELD_LEN: usize = 256;

/// Maximum number of text bytes a message can hold.
pub const MAX_TEXT_BYTES: usize = TEXT_FIELD_LEN - 1;

/// Bounded message text.
///
/// Construction normalizes the input: text stops at the first NUL byte and
/// is cut to at most [`MAX_TEXT_BYTES`] bytes on a UTF-8 character boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct MessageText(String);

impl MessageText {
    /// Normalize `raw` into a bounded text, discarding whether it was cut.
    pub fn new(raw: &str) -> Self {
        Self::normalize(raw).0
    }

    /// Normalize `raw` and report whether any bytes were dropped.
    ///
    /// The flag is `true` when the input contained a NUL byte or was longer
    /// than [`MAX_TEXT_BYTES`].
    pub fn normalize(raw: &str) -> (Self, bool) {
        let until_nul = match raw.find('\0') {
            Some(pos) => &raw[..pos],
            None => raw,
        };

        let mut end = until_nul.len().min(MAX_TEXT_BYTES);
        while !until_nul.is_char_boundary(end) {
            end -= 1;
        }

        let text = &until_nul[..end];
        (Self(text.to_string()), text.len() != raw.len())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

}

impl From<String> for MessageText {
    fn from(raw: String) -> Self {
        if raw.len() <= MAX_TEXT_BYTES && !raw.contains('\0') {
            return Self(raw);
        }
        Self::new(&raw)
    }
}

impl From<MessageText> for String {
    fn from(text: MessageText) -> Self {
        text.0
    }
}

impl AsRef<str> for MessageText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A timestamped chat message.
///
/// Immutable once created: undo and redo move messages between structures
/// but never change their text or timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    text: MessageText,
    /// Seconds since the Unix epoch.
    created_at: i64,
}

impl Message {
    pub fn new(text: MessageText, created_at: i64) -> Self {
        Self { text, created_at }
    }

    /// Create a message stamped with the current wall-clock time.
    pub fn now(text: MessageText) -> Self {
        Self::new(text, Utc::now().timestamp())
    }

    pub fn text(&self) -> &MessageText {
        &self.text
    }

    /// Creation time in seconds since the Unix epoch.
    pub fn created_at(&self) -> i64 {
        self.created_at
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
