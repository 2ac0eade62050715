//! Notes and the pins that shape them.

use alloc::vec::Vec;
use arrayvec::ArrayVec;

use crate::config::{MAX_CHORD_SIZE, NOTE_SIZE_MAX};
use crate::error::ModelError;

/// The simultaneous base pitches of one note.
pub type Pitches = ArrayVec<i32, MAX_CHORD_SIZE>;

/// A breakpoint in a note's pitch-bend and size envelope.
///
/// Between two pins both `interval` and `size` move linearly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NotePin {
    /// Semitone offset from the note's base pitches.
    pub interval: i32,
    /// Parts from the note start.
    pub time: i32,
    /// Volume, 0..=NOTE_SIZE_MAX.
    pub size: i32,
}

impl NotePin {
    pub const fn new(interval: i32, time: i32, size: i32) -> Self {
        Self { interval, time, size }
    }

    /// Same pin moved by `dt` parts and `di` semitones.
    pub const fn shifted(self, dt: i32, di: i32) -> Self {
        Self {
            interval: self.interval + di,
            time: self.time + dt,
            size: self.size,
        }
    }

    /// Whether two pins hold the same interval and size.
    pub const fn same_level(&self, other: &NotePin) -> bool {
        self.interval == other.interval && self.size == other.size
    }
}

/// Round half up, matching how the sequencer has always rounded pin values.
pub fn round_half_up(value: f64) -> i32 {
    libm::floor(value + 0.5) as i32
}

/// Interpolate interval and size between `from` and `to` at `ratio` (0.0..=1.0),
/// placing the result at `time`.
pub fn interpolate_pin(from: &NotePin, to: &NotePin, ratio: f64, time: i32) -> NotePin {
    let interval = from.interval as f64 + ratio * (to.interval - from.interval) as f64;
    let size = from.size as f64 + ratio * (to.size - from.size) as f64;
    NotePin::new(round_half_up(interval), time, round_half_up(size))
}

/// Remove interior pins whose neighbours on both sides hold the same
/// interval and size; they add nothing to the curve.
pub fn remove_redundant_pins(pins: &mut Vec<NotePin>) {
    let mut i = 1;
    while i + 1 < pins.len() {
        if pins[i - 1].same_level(&pins[i]) && pins[i].same_level(&pins[i + 1]) {
            pins.remove(i);
        } else {
            i += 1;
        }
    }
}

/// A note in a pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Note {
    /// Base pitches, sounded together.
    pub pitches: Pitches,
    /// Envelope breakpoints, strictly increasing in time.
    pub pins: Vec<NotePin>,
    /// First part of the note, relative to the pattern.
    pub start: i32,
    /// Part after the last one the note covers.
    pub end: i32,
    /// Carry over from the last note of the previous bar without retriggering.
    pub continues_last_pattern: bool,
}

impl Note {
    /// A flat note: one pitch, constant size across `start..end`.
    pub fn new(pitch: i32, start: i32, end: i32, size: i32) -> Self {
        let mut pitches = Pitches::new();
        pitches.push(pitch);
        Self {
            pitches,
            pins: alloc::vec![NotePin::new(0, 0, size), NotePin::new(0, end - start, size)],
            start,
            end,
            continues_last_pattern: false,
        }
    }

    /// A note with explicit pitches and pins, or `TooManyPitches` if the
    /// chord does not fit.
    pub fn try_with_pins(pitches: &[i32], start: i32, end: i32, pins: Vec<NotePin>) -> Result<Self, ModelError> {
        let mut set = Pitches::new();
        for &pitch in pitches {
            set.try_push(pitch).map_err(|_| ModelError::TooManyPitches(pitches.len()))?;
        }
        Ok(Self {
            pitches: set,
            pins,
            start,
            end,
            continues_last_pattern: false,
        })
    }

    /// A note with explicit pitches and pins.
    ///
    /// Panics if more pitches are given than a chord can hold.
    pub fn with_pins(pitches: &[i32], start: i32, end: i32, pins: Vec<NotePin>) -> Self {
        match Self::try_with_pins(pitches, start, end, pins) {
            Ok(note) => note,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn length(&self) -> i32 {
        self.end - self.start
    }

    /// First pin. Every valid note has one.
    pub fn first_pin(&self) -> &NotePin {
        &self.pins[0]
    }

    /// Last pin. Every valid note has one.
    pub fn last_pin(&self) -> &NotePin {
        &self.pins[self.pins.len() - 1]
    }

    /// Whether `next`, starting where this note ends, sounds like the same
    /// note carried on: same number of pitches, and each of this note's
    /// pitches bent by its final interval lands on the matching pitch of `next`.
    pub fn is_continued_by(&self, next: &Note) -> bool {
        if self.pitches.len() != next.pitches.len() || self.pins.is_empty() {
            return false;
        }
        let bend = self.last_pin().interval;
        self.pitches
            .iter()
            .zip(next.pitches.iter())
            .all(|(a, b)| a + bend == *b)
    }

    /// Check every note invariant.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.pitches.is_empty() {
            return Err(ModelError::EmptyPitches);
        }
        if self.pins.is_empty() {
            return Err(ModelError::EmptyPins);
        }
        if self.end <= self.start {
            return Err(ModelError::NoteSpan { start: self.start, end: self.end });
        }
        let first = self.first_pin();
        if first.time != 0 {
            return Err(ModelError::FirstPinTime(first.time));
        }
        if first.interval != 0 {
            return Err(ModelError::FirstPinInterval(first.interval));
        }
        for (index, pin) in self.pins.iter().enumerate() {
            if !(0..=NOTE_SIZE_MAX).contains(&pin.size) {
                return Err(ModelError::PinSize { index, size: pin.size, max: NOTE_SIZE_MAX });
            }
            if index > 0 && pin.time <= self.pins[index - 1].time {
                return Err(ModelError::PinsOutOfOrder { index, time: pin.time });
            }
        }
        let last = self.last_pin().time;
        if last != self.length() {
            return Err(ModelError::LastPinTime { last, length: self.length() });
        }
        if self.continues_last_pattern && self.start != 0 {
            return Err(ModelError::ContinuationNotAtStart(self.start));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_note_is_valid() {
        let note = Note::new(60, 4, 12, NOTE_SIZE_MAX);
        assert_eq!(note.length(), 8);
        assert_eq!(note.pins, vec![NotePin::new(0, 0, 3), NotePin::new(0, 8, 3)]);
        assert_eq!(note.validate(), Ok(()));
    }

    #[test]
    fn validate_catches_broken_pins() {
        let mut note = Note::new(60, 0, 8, 3);
        note.pins[0].interval = 2;
        assert_eq!(note.validate(), Err(ModelError::FirstPinInterval(2)));

        let mut note = Note::new(60, 0, 8, 3);
        note.pins[1].time = 6;
        assert_eq!(note.validate(), Err(ModelError::LastPinTime { last: 6, length: 8 }));

        let mut note = Note::new(60, 0, 8, 3);
        note.pins.insert(1, NotePin::new(0, 0, 3));
        assert_eq!(note.validate(), Err(ModelError::PinsOutOfOrder { index: 1, time: 0 }));

        let mut note = Note::new(60, 2, 8, 3);
        note.continues_last_pattern = true;
        assert_eq!(note.validate(), Err(ModelError::ContinuationNotAtStart(2)));

        let mut note = Note::new(60, 0, 8, 3);
        note.pins.clear();
        assert_eq!(note.validate(), Err(ModelError::EmptyPins));
    }

    #[test]
    fn redundant_pins_removed() {
        let mut pins = vec![
            NotePin::new(0, 0, 3),
            NotePin::new(0, 2, 3),
            NotePin::new(0, 4, 3),
            NotePin::new(2, 6, 3),
            NotePin::new(2, 8, 1),
        ];
        remove_redundant_pins(&mut pins);
        assert_eq!(
            pins,
            vec![
                NotePin::new(0, 0, 3),
                NotePin::new(0, 4, 3),
                NotePin::new(2, 6, 3),
                NotePin::new(2, 8, 1),
            ]
        );
    }

    #[test]
    fn redundant_pins_keep_endpoints() {
        let mut pins = vec![NotePin::new(0, 0, 3), NotePin::new(0, 4, 3)];
        remove_redundant_pins(&mut pins);
        assert_eq!(pins.len(), 2);
    }

    #[test]
    fn interpolation_rounds_half_up() {
        let a = NotePin::new(0, 0, 0);
        let b = NotePin::new(-3, 4, 3);
        let mid = interpolate_pin(&a, &b, 0.5, 2);
        // -1.5 rounds up to -1, 1.5 rounds up to 2
        assert_eq!(mid, NotePin::new(-1, 2, 2));
    }

    #[test]
    fn continuation_follows_final_bend() {
        let mut prev = Note::new(60, 0, 8, 3);
        prev.pins[1].interval = 2;
        let next = Note::new(62, 8, 12, 3);
        assert!(prev.is_continued_by(&next));
        assert!(!prev.is_continued_by(&Note::new(60, 8, 12, 3)));

        let chord = Note::with_pins(&[62, 66], 8, 12, vec![NotePin::new(0, 0, 3), NotePin::new(0, 4, 3)]);
        assert!(!prev.is_continued_by(&chord));
    }

    #[test]
    fn oversized_chord_is_rejected() {
        let flat = || vec![NotePin::new(0, 0, 3), NotePin::new(0, 4, 3)];
        let full: Vec<i32> = (0..MAX_CHORD_SIZE as i32).map(|i| 48 + i).collect();
        let note = Note::try_with_pins(&full, 0, 4, flat());
        assert_eq!(note.map(|n| n.pitches.len()), Ok(MAX_CHORD_SIZE));

        let too_many: Vec<i32> = (0..=MAX_CHORD_SIZE as i32).map(|i| 48 + i).collect();
        assert_eq!(
            Note::try_with_pins(&too_many, 0, 4, flat()),
            Err(ModelError::TooManyPitches(MAX_CHORD_SIZE + 1))
        );
    }

    #[test]
    #[should_panic(expected = "more than a chord can hold")]
    fn with_pins_panics_on_oversized_chord() {
        let too_many: Vec<i32> = (0..=MAX_CHORD_SIZE as i32).collect();
        Note::with_pins(&too_many, 0, 4, vec![NotePin::new(0, 0, 3), NotePin::new(0, 4, 3)]);
    }
}
