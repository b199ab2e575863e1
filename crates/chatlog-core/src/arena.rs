//! Message arena with generational handles.
//!
//! Every live [`Message`] is stored exactly once here. The ordered log and the
//! undo/redo stacks hold [`MessageId`] handles instead of the messages
//! themselves, so moving a message between structures is a handle copy.
//!
//! Freed slots are reused. Each slot carries a generation counter that is
//! bumped on removal, so a handle to a freed message never resolves to a
//! later occupant of the same slot.

use std::fmt;

use chatlog_types::message::Message;

/// Stable handle to a message in a [`MessageArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId {
    index: usize,
    generation: u32,
}

impl MessageId {
    /// Slot index inside the arena.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    message: Option<Message>,
}

/// Owner of all live messages.
#[derive(Debug, Default)]
pub struct MessageArena {
    slots: Vec<Slot>,
    free: Vec<usize>,
    live: usize,
}

impl MessageArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a message and return its handle.
    pub fn insert(&mut self, message: Message) -> MessageId {
        self.live += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.message = Some(message);
            return MessageId {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len();
        self.slots.push(Slot {
            generation: 0,
            message: Some(message),
        });
        MessageId {
            index,
            generation: 0,
        }
    }

    /// Remove and return the message behind `id`.
    ///
    /// Returns `None` for stale or unknown handles.
    pub fn remove(&mut self, id: MessageId) -> Option<Message> {
        let slot = self.slots.get_mut(id.index)?;
        if slot.generation != id.generation {
            return None;
        }
        let message = slot.message.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.live -= 1;
        Some(message)
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.message.as_ref())
    }

    pub fn contains(&self, id: MessageId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live messages.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Drop every live message. Returns how many were released.
    ///
    /// Slots are kept (with bumped generations) so handles issued before
    /// the clear stay stale.
    pub fn clear(&mut self) -> usize {
        let released = self.live;
        self.free.clear();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.message.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free.push(index);
        }
        self.live = 0;
        released
    }
}
