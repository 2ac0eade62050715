//! Time-range selection in one bar of one channel.

use pr_edit::PatternSelection;

/// A part range dragged out in one bar of a channel.
///
/// `anchor` is where the drag started and `cursor` where it is now; either
/// may be the larger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    pub channel: usize,
    pub bar: usize,
    pub anchor: i32,
    pub cursor: i32,
}

impl Selection {
    /// Start a selection at a single part.
    pub fn at(channel: usize, bar: usize, part: i32) -> Self {
        Self { channel, bar, anchor: part, cursor: part }
    }

    /// Normalized `(start, end)` bounds.
    pub fn bounds(&self) -> (i32, i32) {
        (self.anchor.min(self.cursor), self.anchor.max(self.cursor))
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.cursor
    }

    /// The selected parts as a range within the bar's pattern.
    pub fn parts(&self) -> PatternSelection {
        let (start, end) = self.bounds();
        PatternSelection { start, end }
    }
}
