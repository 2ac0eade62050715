//! Undo/redo history of recorded changes.

use pr_edit::Change;

/// Undo/redo stack.
///
/// Changes before `position` can be undone; the rest can be redone until a
/// new change is pushed.
#[derive(Debug, Default)]
pub struct UndoStack {
    entries: Vec<Change>,
    position: usize,
}

impl UndoStack {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            position: 0,
        }
    }

    /// Record a performed change.
    pub fn push(&mut self, change: Change) {
        // Truncate any redo history beyond current position
        self.entries.truncate(self.position);
        self.entries.push(change);
        self.position = self.entries.len();
    }

    /// Step back: returns the change to undo, or None if nothing to undo.
    pub fn undo(&mut self) -> Option<&Change> {
        if self.position == 0 {
            return None;
        }
        self.position -= 1;
        Some(&self.entries[self.position])
    }

    /// Step forward: returns the change to redo, or None if nothing to redo.
    pub fn redo(&mut self) -> Option<&Change> {
        if self.position >= self.entries.len() {
            return None;
        }
        let change = &self.entries[self.position];
        self.position += 1;
        Some(change)
    }

    pub fn can_undo(&self) -> bool {
        self.position > 0
    }

    pub fn can_redo(&self) -> bool {
        self.position < self.entries.len()
    }

    /// Number of recorded changes, including undone ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
