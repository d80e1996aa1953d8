//! Bounded linear undo/redo history for an edit session.
//!
//! The store keeps every version the user visited in chronological order and a
//! cursor pointing at the one currently shown. It is a line, not a tree:
//! pushing after an undo throws the redo branch away.
//!
//! Transitions are pure (`self -> Self`) so a controller can treat the store as
//! a reducer, or call [`HistoryState::dispatch`] to update in place.
//!
//! ```
//! use prism_core::HistoryState;
//!
//! let history = HistoryState::new(None)
//!     .push("imgA")
//!     .push("imgB")
//!     .undo();
//! assert_eq!(history.present(), Some(&"imgA"));
//! assert!(history.can_redo());
//! ```

use tracing::{debug, trace, warn};

use crate::HistoryConfig;

/// Number of entries kept when no capacity is given.
pub const DEFAULT_CAPACITY: usize = 50;

/// One transition of the history store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryAction<T> {
    /// Append a new present, discarding the redo branch.
    Push(T),
    /// Step back one entry. No-op at the oldest entry or when empty.
    Undo,
    /// Step forward one entry. No-op at the newest entry.
    Redo,
    /// Erase everything and start over from `None` (empty) or a single value.
    SetInitial(Option<T>),
}

/// Past, present and future versions of a value with a cursor.
///
/// `cursor` is `None` exactly when `entries` is empty; otherwise it indexes
/// into `entries`. `entries.len()` never exceeds `capacity`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryState<T> {
    entries: Vec<T>,
    cursor: Option<usize>,
    capacity: usize,
}

impl<T> Default for HistoryState<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            cursor: None,
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl<T> HistoryState<T> {
    /// Create a store holding `initial` (if any) with [`DEFAULT_CAPACITY`].
    pub fn new(initial: Option<T>) -> Self {
        Self::with_capacity(initial, DEFAULT_CAPACITY)
    }

    /// Create a store with an explicit capacity. A capacity of zero is raised
    /// to one: a pushed value always has to fit as the present.
    pub fn with_capacity(initial: Option<T>, capacity: usize) -> Self {
        let capacity = if capacity == 0 {
            warn!("history capacity 0 requested, using 1");
            1
        } else {
            capacity
        };

        let mut state = Self {
            entries: Vec::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            cursor: None,
            capacity,
        };
        state.apply_set_initial(initial);

        debug!(
            capacity,
            seeded = state.cursor.is_some(),
            "history store created"
        );
        state
    }

    /// Create a store sized from a loaded [`HistoryConfig`].
    pub fn from_config(initial: Option<T>, config: &HistoryConfig) -> Self {
        Self::with_capacity(initial, config.capacity)
    }

    /// Append `value` as the new present.
    pub fn push(mut self, value: T) -> Self {
        self.apply_push(value);
        self
    }

    /// Move the cursor one entry back, if there is one.
    pub fn undo(mut self) -> Self {
        self.apply_undo();
        self
    }

    /// Move the cursor one entry forward, if there is one.
    pub fn redo(mut self) -> Self {
        self.apply_redo();
        self
    }

    /// Reset to empty (`None`) or to a single entry at cursor 0.
    /// Capacity is kept. The previous history cannot be recovered.
    pub fn set_initial(mut self, value: Option<T>) -> Self {
        self.apply_set_initial(value);
        self
    }

    /// Pure transition table.
    pub fn reduce(mut self, action: HistoryAction<T>) -> Self {
        self.dispatch(action);
        self
    }

    /// Apply `action` in place.
    pub fn dispatch(&mut self, action: HistoryAction<T>) {
        match action {
            HistoryAction::Push(value) => self.apply_push(value),
            HistoryAction::Undo => self.apply_undo(),
            HistoryAction::Redo => self.apply_redo(),
            HistoryAction::SetInitial(value) => self.apply_set_initial(value),
        }
    }

    /// The entry under the cursor.
    pub fn present(&self) -> Option<&T> {
        self.cursor.and_then(|c| self.entries.get(c))
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.cursor, Some(c) if c > 0)
    }

    pub fn can_redo(&self) -> bool {
        matches!(self.cursor, Some(c) if c + 1 < self.entries.len())
    }

    /// All retained entries, oldest first.
    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn apply_push(&mut self, value: T) {
        if let Some(cursor) = self.cursor {
            let redo_len = self.entries.len() - (cursor + 1);
            if redo_len > 0 {
                self.entries.truncate(cursor + 1);
                debug!(discarded = redo_len, "redo branch discarded");
            }
        }

        self.entries.push(value);

        if self.entries.len() > self.capacity {
            let evicted = self.entries.len() - self.capacity;
            self.entries.drain(..evicted);
            debug!(evicted, capacity = self.capacity, "evicted oldest entries");
        }

        self.cursor = Some(self.entries.len() - 1);
        trace!(cursor = ?self.cursor, len = self.entries.len(), "push");
    }

    fn apply_undo(&mut self) {
        match self.cursor {
            Some(c) if c > 0 => {
                self.cursor = Some(c - 1);
                trace!(cursor = c - 1, len = self.entries.len(), "undo");
            }
            _ => trace!("undo ignored: at oldest entry"),
        }
    }

    fn apply_redo(&mut self) {
        match self.cursor {
            Some(c) if c + 1 < self.entries.len() => {
                self.cursor = Some(c + 1);
                trace!(cursor = c + 1, len = self.entries.len(), "redo");
            }
            _ => trace!("redo ignored: at newest entry"),
        }
    }

    fn apply_set_initial(&mut self, value: Option<T>) {
        self.entries.clear();
        self.cursor = None;
        if let Some(value) = value {
            self.entries.push(value);
            self.cursor = Some(0);
        }
        trace!(seeded = self.cursor.is_some(), "history reset");
    }
}
