//! Invariant violations in the timeline model.

/// A broken invariant on a note, pattern, channel or song.
///
/// Editing code treats any of these as a programmer error: the input was
/// already corrupt before the edit started.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("note has no pins")]
    EmptyPins,
    #[error("note has no pitches")]
    EmptyPitches,
    #[error("note has {0} pitches, more than a chord can hold")]
    TooManyPitches(usize),
    #[error("first pin is at time {0}, expected 0")]
    FirstPinTime(i32),
    #[error("first pin has interval {0}, expected 0")]
    FirstPinInterval(i32),
    #[error("pin {index} at time {time} does not come after the previous pin")]
    PinsOutOfOrder { index: usize, time: i32 },
    #[error("pin {index} has size {size}, outside 0..={max}")]
    PinSize { index: usize, size: i32, max: i32 },
    #[error("last pin is at time {last}, but note is {length} parts long")]
    LastPinTime { last: i32, length: i32 },
    #[error("note spans {start}..{end}, which is empty or negative")]
    NoteSpan { start: i32, end: i32 },
    #[error("note starting at {0} continues the last pattern but does not start at 0")]
    ContinuationNotAtStart(i32),
    #[error("note {index} starts at {start}, before the previous note ends at {previous_end}")]
    NotesOverlap { index: usize, start: i32, previous_end: i32 },
    #[error("note {index} ends at {end}, past the bar length {bar_length}")]
    NotePastBar { index: usize, end: i32, bar_length: i32 },
    #[error("bar {bar} points at pattern {pattern}, but the channel has {count} patterns")]
    MissingPattern { bar: usize, pattern: usize, count: usize },
    #[error("channel has {bars} bars, song has {bar_count}")]
    BarCount { bars: usize, bar_count: usize },
    #[error("{what} in channel {channel}: {source}")]
    InChannel {
        channel: usize,
        what: &'static str,
        #[source]
        source: alloc::boxed::Box<ModelError>,
    },
}

impl ModelError {
    /// Attach a channel index to an error raised further down.
    pub fn in_channel(self, channel: usize, what: &'static str) -> Self {
        ModelError::InChannel {
            channel,
            what,
            source: alloc::boxed::Box::new(self),
        }
    }
}
