//! Headless editing controller for the pinroll piano roll.
//!
//! A [`Document`] owns one song, its undo history and the current
//! selection, and tells a [`ChangeNotifier`] whenever the song changes.
//! Every edit goes through an operation from [`pr_edit`], which mutates the
//! song and returns the [`Change`] the document records.

mod selection;
mod undo;

// Re-export common types so callers don't need pr-model/pr-edit directly.
pub use pr_edit::{BeatsPerBarStrategy, Change, PatternSelection, ScaleMap};
pub use pr_model::{Note, NotePin, NoteRef, Pattern, Song};
pub use selection::Selection;
pub use undo::UndoStack;

pub use pr_edit;
pub use pr_model;

/// Receives one call after every edit, undo or redo that changed the song.
pub trait ChangeNotifier {
    fn notify(&mut self);
}

impl<F: FnMut()> ChangeNotifier for F {
    fn notify(&mut self) {
        self()
    }
}

/// A song being edited.
pub struct Document {
    song: Song,
    history: UndoStack,
    notifier: Box<dyn ChangeNotifier>,
    /// Current selection, if any
    pub selection: Option<Selection>,
}

impl Document {
    /// A document that notifies nobody.
    pub fn new(song: Song) -> Self {
        Self::with_notifier(song, Box::new(|| {}))
    }

    pub fn with_notifier(song: Song, notifier: Box<dyn ChangeNotifier>) -> Self {
        Self {
            song,
            history: UndoStack::new(),
            notifier,
            selection: None,
        }
    }

    pub fn song(&self) -> &Song {
        &self.song
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    // --- Editing ---

    /// Store a change that was already performed on this document's song.
    /// No-ops are dropped. Returns whether the change was kept.
    pub fn record(&mut self, change: Change) -> bool {
        if change.is_noop() {
            log::trace!("dropped no-op change");
            return false;
        }
        log::debug!("recorded change of {} edits", change.edit_count());
        self.history.push(change);
        self.notifier.notify();
        true
    }

    /// Run an edit operation against the song and record what it did.
    pub fn apply<F>(&mut self, edit: F) -> bool
    where
        F: FnOnce(&mut Song) -> Change,
    {
        let change = edit(&mut self.song);
        self.record(change)
    }

    pub fn undo(&mut self) -> bool {
        let Some(change) = self.history.undo() else {
            return false;
        };
        change.undo(&mut self.song);
        log::debug!("undid change of {} edits", change.edit_count());
        self.notifier.notify();
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(change) = self.history.redo() else {
            return false;
        };
        change.redo(&mut self.song);
        log::debug!("redid change of {} edits", change.edit_count());
        self.notifier.notify();
        true
    }

    // --- Selection ---

    /// Channel, pattern index and part range of the current selection, when
    /// it covers parts of a bar that holds a pattern.
    fn selected_pattern(&self) -> Option<(usize, usize, PatternSelection)> {
        let selection = self.selection.filter(|s| !s.is_empty())?;
        let pattern = self.song.channels.get(selection.channel)?.pattern_index(selection.bar)?;
        Some((selection.channel, pattern, selection.parts()))
    }

    /// Split the notes of the selected pattern at the selection edges.
    pub fn split_at_selection(&mut self) -> bool {
        let Some((channel, pattern, parts)) = self.selected_pattern() else {
            return false;
        };
        self.apply(|song| pr_edit::split_notes_at_selection(song, channel, pattern, parts))
    }

    /// Carry the selected notes through `map`; the whole pattern at the
    /// selection's bar when the selection is empty.
    pub fn remap_selection(&mut self, map: &ScaleMap) -> bool {
        let Some(selection) = self.selection else {
            return false;
        };
        let Some(pattern) = self
            .song
            .channels
            .get(selection.channel)
            .and_then(|channel| channel.pattern_index(selection.bar))
        else {
            return false;
        };
        let parts = (!selection.is_empty()).then(|| selection.parts());
        self.apply(|song| pr_edit::change_pattern_scale(song, selection.channel, pattern, map, parts))
    }

    /// Clear the selected parts of the selected pattern.
    pub fn clear_selection(&mut self) -> bool {
        let Some((channel, pattern, parts)) = self.selected_pattern() else {
            return false;
        };
        self.apply(|song| pr_edit::change_note_truncate(song, channel, pattern, parts.start, parts.end, None))
    }
}
