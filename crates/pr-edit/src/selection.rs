//! Part ranges within a pattern.

use arrayvec::ArrayVec;
use pr_model::Note;

/// A half-open range of parts, `start..end`, inside one pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PatternSelection {
    pub start: i32,
    pub end: i32,
}

impl PatternSelection {
    /// Range between two parts, in either order.
    pub fn new(a: i32, b: i32) -> Self {
        Self { start: a.min(b), end: a.max(b) }
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Whether any part of `note` lies inside the range.
    pub fn overlaps(&self, note: &Note) -> bool {
        note.start < self.end && note.end > self.start
    }

    /// Range edges that fall strictly inside `note`, ascending.
    pub fn cuts(&self, note: &Note) -> ArrayVec<i32, 2> {
        let mut cuts = ArrayVec::new();
        for edge in [self.start, self.end] {
            if note.start < edge && edge < note.end && !cuts.contains(&edge) {
                cuts.push(edge);
            }
        }
        cuts
    }
}
