//! Patterns: reusable blocks of notes placed into bars.

use alloc::vec::Vec;

use crate::error::ModelError;
use crate::note::Note;

/// A block of notes that one or more bars of a channel can point at.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Pattern {
    /// Notes, sorted by start (mod channels may hold them out of order).
    pub notes: Vec<Note>,
    /// Indices of the channel instruments that play this pattern.
    pub instruments: Vec<usize>,
}

impl Pattern {
    /// An empty pattern played by the given instruments.
    pub fn new(instruments: &[usize]) -> Self {
        Self {
            notes: Vec::new(),
            instruments: instruments.to_vec(),
        }
    }

    /// A pattern holding `notes`, played by instrument 0.
    pub fn with_notes(notes: Vec<Note>) -> Self {
        Self {
            notes,
            instruments: alloc::vec![0],
        }
    }

    /// Whether both patterns use the same set of instruments, in any order.
    pub fn same_instruments(&self, other: &Pattern) -> bool {
        sorted_set(&self.instruments) == sorted_set(&other.instruments)
    }

    /// Whether the patterns are interchangeable in a bar.
    pub fn same_content(&self, other: &Pattern) -> bool {
        self.same_instruments(other) && compare_pattern_notes(&self.notes, &other.notes)
    }

    /// Check every note, plus ordering and bounds within a bar of `bar_length` parts.
    ///
    /// `ordered` is false for mod channels, whose notes may be written out of order.
    pub fn validate(&self, bar_length: i32, ordered: bool) -> Result<(), ModelError> {
        let mut previous_end = 0;
        for (index, note) in self.notes.iter().enumerate() {
            note.validate()?;
            if note.start < 0 {
                return Err(ModelError::NoteSpan { start: note.start, end: note.end });
            }
            if note.end > bar_length {
                return Err(ModelError::NotePastBar { index, end: note.end, bar_length });
            }
            if ordered {
                if note.start < previous_end {
                    return Err(ModelError::NotesOverlap {
                        index,
                        start: note.start,
                        previous_end,
                    });
                }
                previous_end = note.end;
            }
        }
        Ok(())
    }
}

/// Compare two note lists field by field: timing, pitches in order, pins in
/// order, and the continuation flag.
pub fn compare_pattern_notes(a: &[Note], b: &[Note]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).all(|(x, y)| {
        x.start == y.start
            && x.end == y.end
            && x.continues_last_pattern == y.continues_last_pattern
            && x.pitches.as_slice() == y.pitches.as_slice()
            && x.pins.len() == y.pins.len()
            && x.pins.iter().zip(y.pins.iter()).all(|(p, q)| {
                p.interval == q.interval && p.time == q.time && p.size == q.size
            })
    })
}

fn sorted_set(values: &[usize]) -> Vec<usize> {
    let mut set = values.to_vec();
    set.sort_unstable();
    set.dedup();
    set
}
