//! Synchronous observer lists for widget notifications.
//!
//! Callbacks run inside the call that caused the change, in the order they
//! were connected.

use std::fmt;

use super::interaction::roi::ImageRect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

/// Emitted when a rubber-band drag commits a non-empty region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoiSelected {
    pub roi: ImageRect,
}

/// Emitted whenever the zoom level takes a new value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomChanged {
    pub zoom: f64,
}

type Callback<T> = Box<dyn FnMut(&T)>;

pub struct Signal<T> {
    slots: Vec<(ConnectionId, Callback<T>)>,
    next_id: u64,
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            next_id: 0,
        }
    }
}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("connections", &self.slots.len())
            .finish()
    }
}

impl<T> Signal<T> {
    pub fn connect(&mut self, callback: impl FnMut(&T) + 'static) -> ConnectionId {
        self.next_id = self.next_id.saturating_add(1);
        let id = ConnectionId(self.next_id);
        self.slots.push((id, Box::new(callback)));
        id
    }

    /// Returns `false` when `id` was not connected.
    pub fn disconnect(&mut self, id: ConnectionId) -> bool {
        let before = self.slots.len();
        self.slots.retain(|(slot_id, _)| *slot_id != id);
        self.slots.len() != before
    }

    pub fn emit(&mut self, payload: &T) {
        for (_, callback) in &mut self.slots {
            callback(payload);
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
