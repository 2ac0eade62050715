//! Undoable changes.
//!
//! A change is built by performing its edits against the song right away;
//! the finished value only records what happened so it can be undone and
//! redone exactly. A change that altered nothing reports `is_noop()` and
//! should not be stored in history.

use alloc::vec::Vec;
use pr_model::{Edit, Song};

/// One user-level edit: a primitive edit or an ordered composite of changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Change {
    Edit(Edit),
    Group(ChangeGroup),
    Sequence(ChangeSequence),
}

impl Change {
    /// Apply `edit` to the song now and record it.
    pub fn perform(song: &mut Song, edit: Edit) -> Change {
        edit.forward(song);
        Change::Edit(edit)
    }

    /// A change that did nothing.
    pub fn none() -> Change {
        Change::Group(ChangeGroup::new())
    }

    pub fn is_noop(&self) -> bool {
        match self {
            Change::Edit(edit) => edit.is_noop(),
            Change::Group(group) => group.is_noop(),
            Change::Sequence(sequence) => sequence.is_noop(),
        }
    }

    /// Restore the song to how it was before this change.
    pub fn undo(&self, song: &mut Song) {
        match self {
            Change::Edit(edit) => edit.backward(song),
            Change::Group(group) => group.undo(song),
            Change::Sequence(sequence) => sequence.undo(song),
        }
    }

    /// Re-apply this change after an undo.
    pub fn redo(&self, song: &mut Song) {
        match self {
            Change::Edit(edit) => edit.forward(song),
            Change::Group(group) => group.redo(song),
            Change::Sequence(sequence) => sequence.redo(song),
        }
    }

    /// Number of primitive edits inside this change.
    pub fn edit_count(&self) -> usize {
        match self {
            Change::Edit(_) => 1,
            Change::Group(group) => group.changes().iter().map(Change::edit_count).sum(),
            Change::Sequence(sequence) => sequence.changes().iter().map(Change::edit_count).sum(),
        }
    }
}

/// Ordered list of changes undone and redone as one.
///
/// Children redo in append order and undo in reverse order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeGroup {
    changes: Vec<Change>,
}

impl ChangeGroup {
    pub fn new() -> Self {
        Self { changes: Vec::new() }
    }

    /// Add an already-performed change. No-ops are dropped.
    pub fn append(&mut self, change: Change) {
        if change.is_noop() {
            return;
        }
        self.changes.push(change);
    }

    /// Perform `edit` now and append it.
    pub fn perform(&mut self, song: &mut Song, edit: Edit) {
        self.append(Change::perform(song, edit));
    }

    /// True when no child did anything.
    pub fn is_noop(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    pub fn undo(&self, song: &mut Song) {
        for change in self.changes.iter().rev() {
            change.undo(song);
        }
    }

    pub fn redo(&self, song: &mut Song) {
        for change in &self.changes {
            change.redo(song);
        }
    }
}

impl From<ChangeGroup> for Change {
    fn from(group: ChangeGroup) -> Self {
        Change::Group(group)
    }
}

/// A group whose children were produced by walking a pattern's notes while
/// editing that same note list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeSequence {
    group: ChangeGroup,
}

impl ChangeSequence {
    pub fn new() -> Self {
        Self { group: ChangeGroup::new() }
    }

    /// Visit every note that was in the pattern when the walk began, in order.
    ///
    /// `visit` receives the song, the note's current index, and its index at
    /// the start of the walk, and returns the change it performed. Notes the
    /// visitor inserts are stepped over; when it removes the visited note the
    /// walk stays on the same index, which now holds the next original note.
    pub fn over_notes<F>(song: &mut Song, channel: usize, pattern: usize, mut visit: F) -> Self
    where
        F: FnMut(&mut Song, usize, usize) -> Change,
    {
        let mut sequence = Self::new();
        let mut index = 0;
        let mut ordinal = 0;
        while index < song.pattern(channel, pattern).notes.len() {
            let before = song.pattern(channel, pattern).notes.len() as isize;
            let change = visit(song, index, ordinal);
            let after = song.pattern(channel, pattern).notes.len() as isize;
            sequence.append(change);
            index = (index + 1).saturating_add_signed(after - before).max(index);
            ordinal += 1;
        }
        sequence
    }

    pub fn append(&mut self, change: Change) {
        self.group.append(change);
    }

    pub fn is_noop(&self) -> bool {
        self.group.is_noop()
    }

    pub fn changes(&self) -> &[Change] {
        self.group.changes()
    }

    pub fn undo(&self, song: &mut Song) {
        self.group.undo(song);
    }

    pub fn redo(&self, song: &mut Song) {
        self.group.redo(song);
    }
}

impl From<ChangeSequence> for Change {
    fn from(sequence: ChangeSequence) -> Self {
        Change::Sequence(sequence)
    }
}
