//! Primitive, exactly reversible mutations of a song.
//!
//! Every edit stores both the value it replaces and the value it installs,
//! so `backward` restores the previous state verbatim instead of
//! recomputing it.

use alloc::vec::Vec;

use crate::note::Note;
use crate::song::{Channel, NoteRef, Song, SongSettings};

/// An edit command that mutates song data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Edit {
    /// Replace one note in place.
    SetNote { at: NoteRef, old: Note, new: Note },
    /// Insert a note at `index` in a pattern.
    InsertNote {
        channel: usize,
        pattern: usize,
        index: usize,
        note: Note,
    },
    /// Remove the note at `index` in a pattern.
    RemoveNote {
        channel: usize,
        pattern: usize,
        index: usize,
        note: Note,
    },
    /// Swap the entire channel list (bulk restructuring).
    SetChannels { old: Vec<Channel>, new: Vec<Channel> },
    /// Swap song-wide settings.
    SetSettings { old: SongSettings, new: SongSettings },
}

impl Edit {
    /// Apply the edit.
    pub fn forward(&self, song: &mut Song) {
        match self {
            Edit::SetNote { at, new, .. } => *song.note_mut(*at) = new.clone(),
            Edit::InsertNote { channel, pattern, index, note } => {
                song.pattern_mut(*channel, *pattern).notes.insert(*index, note.clone());
            }
            Edit::RemoveNote { channel, pattern, index, .. } => {
                song.pattern_mut(*channel, *pattern).notes.remove(*index);
            }
            Edit::SetChannels { new, .. } => song.channels = new.clone(),
            Edit::SetSettings { new, .. } => song.settings = *new,
        }
    }

    /// Revert the edit, restoring the stored previous values.
    pub fn backward(&self, song: &mut Song) {
        match self {
            Edit::SetNote { at, old, .. } => *song.note_mut(*at) = old.clone(),
            Edit::InsertNote { channel, pattern, index, .. } => {
                song.pattern_mut(*channel, *pattern).notes.remove(*index);
            }
            Edit::RemoveNote { channel, pattern, index, note } => {
                song.pattern_mut(*channel, *pattern).notes.insert(*index, note.clone());
            }
            Edit::SetChannels { old, .. } => song.channels = old.clone(),
            Edit::SetSettings { old, .. } => song.settings = *old,
        }
    }

    /// Whether applying the edit leaves the song unchanged.
    pub fn is_noop(&self) -> bool {
        match self {
            Edit::SetNote { old, new, .. } => old == new,
            Edit::InsertNote { .. } | Edit::RemoveNote { .. } => false,
            Edit::SetChannels { old, new } => old == new,
            Edit::SetSettings { old, new } => old == new,
        }
    }
}
