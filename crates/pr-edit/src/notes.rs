//! Adding, removing, splitting and range-clearing notes in a pattern.

use alloc::vec::Vec;

use pr_model::{Edit, Note, NoteRef, Song};

use crate::change::{Change, ChangeGroup, ChangeSequence};
use crate::pins::{change_note_length, expect_valid, resize_note};
use crate::projection::project_note_into_bar;
use crate::selection::PatternSelection;

/// Insert `note` at `index` in a pattern.
pub fn add_note(song: &mut Song, channel: usize, pattern: usize, index: usize, note: Note) -> Change {
    Change::perform(song, Edit::InsertNote { channel, pattern, index, note })
}

/// Remove the note at `index` in a pattern.
pub fn remove_note(song: &mut Song, channel: usize, pattern: usize, index: usize) -> Change {
    let note = song.pattern(channel, pattern).notes[index].clone();
    Change::perform(song, Edit::RemoveNote { channel, pattern, index, note })
}

/// Cut `note` at each part in `cuts` (ascending, strictly inside the note).
fn split_pieces(note: &Note, cuts: &[i32]) -> Vec<Note> {
    expect_valid(note);
    let mut bounds = Vec::with_capacity(cuts.len() + 2);
    bounds.push(note.start);
    bounds.extend_from_slice(cuts);
    bounds.push(note.end);

    let mut pieces = Vec::with_capacity(cuts.len() + 1);
    for window in bounds.windows(2) {
        // Each piece gets its own list so a continuing note is not merged back.
        let mut piece = Vec::with_capacity(1);
        project_note_into_bar(note, note.start - window[0], window[0], window[1], &mut piece);
        pieces.append(&mut piece);
    }
    pieces
}

/// Replace the note at `index` with its pieces cut at `cuts`.
pub fn split_note_at_points(
    song: &mut Song,
    channel: usize,
    pattern: usize,
    index: usize,
    cuts: &[i32],
) -> Change {
    if cuts.is_empty() {
        return Change::none();
    }
    let pieces = split_pieces(&song.pattern(channel, pattern).notes[index], cuts);
    let mut group = ChangeGroup::new();
    group.append(remove_note(song, channel, pattern, index));
    for (offset, piece) in pieces.into_iter().enumerate() {
        group.append(add_note(song, channel, pattern, index + offset, piece));
    }
    group.into()
}

/// Split every note straddling an edge of `selection` at that edge.
pub fn split_notes_at_selection(
    song: &mut Song,
    channel: usize,
    pattern: usize,
    selection: PatternSelection,
) -> Change {
    ChangeSequence::over_notes(song, channel, pattern, |song, index, _| {
        let cuts = selection.cuts(&song.pattern(channel, pattern).notes[index]);
        split_note_at_points(song, channel, pattern, index, &cuts)
    })
    .into()
}

/// Clear the parts `start..end` of a pattern.
///
/// Notes inside the range are removed, notes crossing one edge are
/// shortened, and a note spanning the whole range keeps its head and gets its
/// tail back as a separate note. The note that was at index `skip` when the
/// pass began is left alone.
pub fn change_note_truncate(
    song: &mut Song,
    channel: usize,
    pattern: usize,
    start: i32,
    end: i32,
    skip: Option<usize>,
) -> Change {
    ChangeSequence::over_notes(song, channel, pattern, |song, index, ordinal| {
        if skip == Some(ordinal) {
            return Change::none();
        }
        let note = song.pattern(channel, pattern).notes[index].clone();
        let at = NoteRef::new(channel, pattern, index);
        if note.end <= start || note.start >= end {
            Change::none()
        } else if note.start < start && note.end > end {
            let mut group = ChangeGroup::new();
            group.append(change_note_length(song, at, note.start, start));
            let tail = resize_note(&note, end, note.end);
            group.append(add_note(song, channel, pattern, index + 1, tail));
            group.into()
        } else if note.start < start {
            change_note_length(song, at, note.start, start)
        } else if note.end > end {
            change_note_length(song, at, end, note.end)
        } else {
            remove_note(song, channel, pattern, index)
        }
    })
    .into()
}
