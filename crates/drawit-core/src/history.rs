//! Bounded, forkable undo/redo history of document snapshots.

use crate::model::Document;

/// Maximum number of snapshots kept by default.
pub const MAX_HISTORY_LENGTH: usize = 50;

/// A sequence of snapshots with a cursor at the current state.
///
/// There is always at least one entry, and `index` always points at one.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Document>,
    index: usize,
    max_len: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(MAX_HISTORY_LENGTH)
    }
}

impl History {
    /// A history holding only the empty document.
    pub fn new(max_len: usize) -> Self {
        Self {
            entries: vec![Document::default()],
            index: 0,
            max_len: max_len.max(1),
        }
    }

    /// Record `snapshot` as the new current state.
    ///
    /// Any redoable future is discarded. When the bound is exceeded the
    /// oldest entry is dropped.
    pub fn push(&mut self, snapshot: Document) {
        self.entries.truncate(self.index + 1);
        self.entries.push(snapshot);
        if self.entries.len() > self.max_len {
            self.entries.remove(0);
        }
        self.index = self.entries.len() - 1;
    }

    /// Step back one entry.
    pub fn undo(&mut self) -> Option<&Document> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        self.entries.get(self.index)
    }

    /// Step forward one entry.
    pub fn redo(&mut self) -> Option<&Document> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        self.entries.get(self.index)
    }

    /// Replace the whole history with a single entry.
    pub fn reseed(&mut self, snapshot: Document) {
        self.entries.clear();
        self.entries.push(snapshot);
        self.index = 0;
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// The snapshot at the cursor.
    pub fn current(&self) -> Option<&Document> {
        self.entries.get(self.index)
    }
}
