//! Append-only ordered log with removal at the tail.

use chatlog_types::error::LogError;

/// Ordered sequence supporting append at the tail and removal of the tail.
///
/// Iteration runs oldest to newest in insertion order. There is no
/// mid-sequence insertion, removal or reordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedLog<T> {
    items: Vec<T>,
}

impl<T> OrderedLog<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Insert `item` as the newest element.
    pub fn append(&mut self, item: T) {
        self.items.push(item);
    }

    /// Remove and return the newest element.
    pub fn remove_last(&mut self) -> Result<T, LogError> {
        self.items.pop().ok_or(LogError::Empty)
    }

    /// Oldest to newest. Restartable and side-effect free.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// The newest element.
    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T> Default for OrderedLog<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> IntoIterator for &'a OrderedLog<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
