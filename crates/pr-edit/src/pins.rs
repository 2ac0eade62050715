//! Pin editing: retiming, pitch bends, length and size changes.
//!
//! Each operation comes as a pure function computing the edited note and a
//! `change_*` wrapper that installs it as an undoable [`Change`]. All of them
//! finish through [`normalize_pins`].

use alloc::vec::Vec;

use pr_model::config::NOTE_SIZE_MAX;
use pr_model::{interpolate_pin, remove_redundant_pins, Edit, Note, NotePin, NoteRef, Song};

use crate::change::Change;

/// Panic unless `note` satisfies every note invariant.
pub(crate) fn expect_valid(note: &Note) {
    if let Err(err) = note.validate() {
        panic!("corrupt note: {err}");
    }
}

/// Install `new_pins` on a copy of `old` and bring the result back to a
/// well-formed note.
///
/// Pins that do not move strictly forward in time are dropped, redundant
/// interior pins are removed, and the first pin is rebased to time 0 and
/// interval 0 by shifting the note's start and pitches to match. The
/// continuation flag takes `continues_last_pattern` when given, else keeps
/// the old value; it is always cleared when the note no longer starts at 0.
///
/// Panics if no pins remain or the result is not a valid note.
pub fn normalize_pins(old: &Note, new_pins: Vec<NotePin>, continues_last_pattern: Option<bool>) -> Note {
    let mut pins: Vec<NotePin> = Vec::with_capacity(new_pins.len());
    for pin in new_pins {
        match pins.last() {
            Some(last) if pin.time <= last.time => {}
            _ => pins.push(pin),
        }
    }
    if pins.is_empty() {
        panic!("corrupt note: pin edit left no pins");
    }
    remove_redundant_pins(&mut pins);

    let first = pins[0];
    let mut pitches = old.pitches.clone();
    for pitch in pitches.iter_mut() {
        *pitch += first.interval;
    }
    for pin in pins.iter_mut() {
        *pin = pin.shifted(-first.time, -first.interval);
    }

    let start = old.start + first.time;
    let end = start + pins[pins.len() - 1].time;
    let continues = continues_last_pattern.unwrap_or(old.continues_last_pattern) && start == 0;

    let note = Note {
        pitches,
        pins,
        start,
        end,
        continues_last_pattern: continues,
    };
    expect_valid(&note);
    note
}

/// Move pin `pin_index` to the absolute part `shifted_time`, dropping every
/// pin it passes over.
pub fn retime_pin(note: &Note, pin_index: usize, shifted_time: i32, continues_last_pattern: bool) -> Note {
    expect_valid(note);
    let moved = note.pins[pin_index];
    let shifted = shifted_time - note.start;
    let skip_start = moved.time.min(shifted);
    let skip_end = moved.time.max(shifted);

    let mut continues = continues_last_pattern;
    let mut pins = Vec::with_capacity(note.pins.len());
    let mut placed = false;
    for pin in &note.pins {
        if pin.time < skip_start {
            pins.push(*pin);
        } else if pin.time > skip_end {
            if !placed {
                if !pins.is_empty() {
                    continues = note.continues_last_pattern;
                }
                pins.push(NotePin::new(moved.interval, shifted, moved.size));
                placed = true;
            }
            pins.push(*pin);
        }
    }
    if !placed {
        continues = note.continues_last_pattern;
        pins.push(NotePin::new(moved.interval, shifted, moved.size));
    }
    normalize_pins(note, pins, Some(continues))
}

/// Bend pitch `pitch_index` so it reaches the absolute pitch `bend_to` at
/// part `bend_end`, ramping from its current value at `bend_start`.
///
/// `bend_end` may lie before `bend_start`; the walk then runs backwards.
/// Pins after the end keep the bent interval only while they held the
/// same interval as the curve just before the end; from the first pin that
/// differs on, the original curve is kept.
pub fn bend_pitch(note: &Note, bend_start: i32, bend_end: i32, bend_to: i32, pitch_index: usize) -> Note {
    expect_valid(note);
    let bend_start = bend_start - note.start;
    let bend_end = bend_end - note.start;
    let bend_to = bend_to - note.pitches[pitch_index];
    let forward = bend_end > bend_start;
    let dir = if forward { 1 } else { -1 };

    let ordered: Vec<NotePin> = if forward {
        note.pins.clone()
    } else {
        note.pins.iter().rev().copied().collect()
    };

    let mut pins = Vec::with_capacity(note.pins.len() + 2);
    let mut set_start = false;
    let mut set_end = false;
    let mut prev_interval = 0;
    let mut prev_size = NOTE_SIZE_MAX;
    let mut persist = true;

    for pin in ordered {
        loop {
            if !set_start {
                if pin.time * dir <= bend_start * dir {
                    prev_interval = pin.interval;
                    prev_size = pin.size;
                }
                if pin.time * dir < bend_start * dir {
                    pins.push(pin);
                    break;
                }
                pins.push(NotePin::new(prev_interval, bend_start, prev_size));
                set_start = true;
            } else if !set_end {
                if pin.time * dir <= bend_end * dir {
                    prev_interval = pin.interval;
                    prev_size = pin.size;
                }
                if pin.time * dir < bend_end * dir {
                    break;
                }
                pins.push(NotePin::new(bend_to, bend_end, prev_size));
                set_end = true;
            } else {
                if pin.time == bend_end {
                    break;
                }
                if pin.interval != prev_interval {
                    persist = false;
                }
                let interval = if persist { bend_to } else { pin.interval };
                pins.push(NotePin::new(interval, pin.time, pin.size));
                break;
            }
        }
    }
    if !set_end {
        pins.push(NotePin::new(bend_to, bend_end, prev_size));
    }
    if !forward {
        pins.reverse();
    }
    log::trace!("pitch bend {bend_start}..{bend_end} to {bend_to}: {} pins", pins.len());
    normalize_pins(note, pins, None)
}

/// Clip or extend the note to the absolute range `trunc_start..trunc_end`.
///
/// Boundary pins take the value in effect at the cut, without interpolation:
/// the start pin carries the last pin at or before `trunc_start`, the end pin
/// the first pin at or after `trunc_end` (or the last pin when extending).
pub fn resize_note(note: &Note, trunc_start: i32, trunc_end: i32) -> Note {
    expect_valid(note);
    let start = trunc_start - note.start;
    let end = trunc_end - note.start;

    let mut pins = Vec::with_capacity(note.pins.len() + 2);
    let mut prev = note.pins[0];
    let mut started = false;
    let mut tail = Some(*note.last_pin());
    for pin in &note.pins {
        if pin.time < start {
            prev = *pin;
        } else if pin.time <= end {
            if !started && pin.time > start {
                pins.push(NotePin::new(prev.interval, start, prev.size));
            }
            started = true;
            pins.push(*pin);
            if pin.time == end {
                tail = None;
                break;
            }
        } else {
            if !started {
                pins.push(NotePin::new(prev.interval, start, prev.size));
                started = true;
            }
            tail = Some(*pin);
            break;
        }
    }
    if !started {
        pins.push(NotePin::new(prev.interval, start, prev.size));
    }
    if let Some(value) = tail {
        pins.push(NotePin::new(value.interval, end, value.size));
    }
    normalize_pins(note, pins, None)
}

/// Set the size at absolute part `bend_part` to `bend_size`, replacing a pin
/// already there or inserting one. The breakpoint's interval is
/// `bend_interval` when given, else the curve's interval at that part.
/// With `uniform_size` every pin takes `bend_size`.
pub fn bend_size(
    note: &Note,
    bend_part: i32,
    bend_size: i32,
    bend_interval: Option<i32>,
    uniform_size: bool,
) -> Note {
    expect_valid(note);
    let part = bend_part - note.start;
    let size = bend_size.clamp(0, NOTE_SIZE_MAX);
    let interval = bend_interval.unwrap_or_else(|| interval_at(note, part));
    let resize = |pin: &NotePin| {
        if uniform_size {
            NotePin::new(pin.interval, pin.time, size)
        } else {
            *pin
        }
    };

    let mut pins = Vec::with_capacity(note.pins.len() + 1);
    let mut placed = false;
    for pin in &note.pins {
        if pin.time < part {
            pins.push(resize(pin));
        } else if pin.time == part {
            pins.push(NotePin::new(interval, part, size));
            placed = true;
        } else {
            if !placed {
                pins.push(NotePin::new(interval, part, size));
                placed = true;
            }
            pins.push(resize(pin));
        }
    }
    if !placed {
        pins.push(NotePin::new(interval, part, size));
    }
    normalize_pins(note, pins, None)
}

/// Interval of the pin curve at note-relative `time`, rounded.
fn interval_at(note: &Note, time: i32) -> i32 {
    let mut prev = note.pins[0];
    for pin in &note.pins {
        if pin.time == time {
            return pin.interval;
        }
        if pin.time > time {
            if time <= prev.time {
                return prev.interval;
            }
            let ratio = (time - prev.time) as f64 / (pin.time - prev.time) as f64;
            return interpolate_pin(&prev, pin, ratio, time).interval;
        }
        prev = *pin;
    }
    prev.interval
}

fn replace_note(song: &mut Song, at: NoteRef, new: Note) -> Change {
    let old = song.note(at).clone();
    Change::perform(song, Edit::SetNote { at, old, new })
}

/// Undoable [`retime_pin`].
pub fn change_pin_time(
    song: &mut Song,
    at: NoteRef,
    pin_index: usize,
    shifted_time: i32,
    continues_last_pattern: bool,
) -> Change {
    let new = retime_pin(song.note(at), pin_index, shifted_time, continues_last_pattern);
    replace_note(song, at, new)
}

/// Undoable [`bend_pitch`].
pub fn change_pitch_bend(
    song: &mut Song,
    at: NoteRef,
    bend_start: i32,
    bend_end: i32,
    bend_to: i32,
    pitch_index: usize,
) -> Change {
    let new = bend_pitch(song.note(at), bend_start, bend_end, bend_to, pitch_index);
    replace_note(song, at, new)
}

/// Undoable [`resize_note`].
pub fn change_note_length(song: &mut Song, at: NoteRef, trunc_start: i32, trunc_end: i32) -> Change {
    let new = resize_note(song.note(at), trunc_start, trunc_end);
    replace_note(song, at, new)
}

/// Undoable [`bend_size`].
pub fn change_size_bend(
    song: &mut Song,
    at: NoteRef,
    bend_part: i32,
    bend_size_to: i32,
    bend_interval: Option<i32>,
    uniform_size: bool,
) -> Change {
    let new = bend_size(song.note(at), bend_part, bend_size_to, bend_interval, uniform_size);
    replace_note(song, at, new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pr_model::Pattern;

    fn pins(values: &[(i32, i32, i32)]) -> Vec<NotePin> {
        values.iter().map(|&(i, t, s)| NotePin::new(i, t, s)).collect()
    }

    fn shaped(pitch: i32, start: i32, values: &[(i32, i32, i32)]) -> Note {
        let pins = pins(values);
        let end = start + pins[pins.len() - 1].time;
        Note::with_pins(&[pitch], start, end, pins)
    }

    #[test]
    fn normalize_rebases_first_pin() {
        let old = Note::new(60, 8, 16, 3);
        let note = normalize_pins(&old, pins(&[(2, 2, 3), (2, 2, 1), (5, 6, 3)]), None);
        assert_eq!(note.pitches[0], 62);
        assert_eq!(note.pins, pins(&[(0, 0, 3), (3, 4, 3)]));
        assert_eq!((note.start, note.end), (10, 14));
    }

    #[test]
    fn normalize_is_idempotent() {
        let old = Note::new(60, 0, 24, 3);
        let once = normalize_pins(&old, pins(&[(0, 0, 3), (0, 6, 3), (0, 12, 3), (4, 24, 2)]), None);
        let twice = normalize_pins(&once, once.pins.clone(), None);
        assert_eq!(once, twice);
    }

    #[test]
    fn normalize_clears_continuation_off_start() {
        let mut old = Note::new(60, 0, 12, 3);
        old.continues_last_pattern = true;
        let kept = normalize_pins(&old, old.pins.clone(), None);
        assert!(kept.continues_last_pattern);
        let moved = normalize_pins(&old, pins(&[(0, 4, 3), (0, 12, 3)]), Some(true));
        assert!(!moved.continues_last_pattern);
        let cleared = normalize_pins(&old, old.pins.clone(), Some(false));
        assert!(!cleared.continues_last_pattern);
    }

    #[test]
    #[should_panic(expected = "corrupt note")]
    fn normalize_rejects_empty() {
        normalize_pins(&Note::new(60, 0, 4, 3), Vec::new(), None);
    }

    #[test]
    fn shorten_to_two_parts() {
        let note = Note::new(60, 0, 4, NOTE_SIZE_MAX);
        let short = resize_note(&note, 0, 2);
        assert_eq!(short.pins, pins(&[(0, 0, 3), (0, 2, 3)]));
        assert_eq!(short.end, 2);
    }

    #[test]
    fn resize_steps_at_cuts() {
        let note = shaped(60, 0, &[(0, 0, 3), (4, 8, 1), (0, 16, 3)]);
        // Cut inside both ramps: no interpolation, values of the pins at the cut.
        let clipped = resize_note(&note, 4, 12);
        assert_eq!(clipped.pitches[0], 60);
        assert_eq!(clipped.pins, pins(&[(0, 0, 3), (4, 4, 1), (0, 8, 3)]));
        assert_eq!((clipped.start, clipped.end), (4, 12));
    }

    #[test]
    fn resize_extends_both_ways() {
        let note = shaped(60, 8, &[(0, 0, 3), (2, 8, 2)]);
        let longer = resize_note(&note, 4, 20);
        assert_eq!((longer.start, longer.end), (4, 20));
        assert_eq!(longer.pins, pins(&[(0, 0, 3), (0, 4, 3), (2, 12, 2), (2, 16, 2)]));
    }

    #[test]
    fn resize_window_between_pins() {
        let note = shaped(60, 0, &[(0, 0, 3), (6, 12, 3)]);
        let inner = resize_note(&note, 3, 9);
        assert_eq!((inner.start, inner.end), (3, 9));
        assert_eq!(inner.pins, pins(&[(0, 0, 3), (6, 6, 3)]));
    }

    #[test]
    fn retime_drops_skipped_pins() {
        let note = shaped(60, 0, &[(0, 0, 3), (2, 4, 3), (5, 8, 3), (0, 12, 3)]);
        let moved = retime_pin(&note, 1, 10, false);
        assert_eq!(moved.pins, pins(&[(0, 0, 3), (2, 10, 3), (0, 12, 3)]));
    }

    #[test]
    fn retime_first_pin_moves_start() {
        let mut note = shaped(60, 0, &[(0, 0, 3), (0, 12, 3)]);
        note.continues_last_pattern = true;
        let moved = retime_pin(&note, 0, 4, true);
        assert_eq!((moved.start, moved.end), (4, 12));
        assert!(!moved.continues_last_pattern);
    }

    #[test]
    fn retime_last_pin_keeps_continuation() {
        let mut note = shaped(60, 0, &[(0, 0, 3), (0, 12, 3)]);
        note.continues_last_pattern = true;
        let moved = retime_pin(&note, 1, 20, false);
        assert_eq!(moved.end, 20);
        assert!(moved.continues_last_pattern);
    }

    #[test]
    fn bend_up_over_flat_note() {
        let note = Note::new(60, 0, 12, 3);
        let bent = bend_pitch(&note, 0, 12, 64, 0);
        assert_eq!(bent.pitches[0], 60);
        assert_eq!(bent.pins, pins(&[(0, 0, 3), (4, 12, 3)]));
    }

    #[test]
    fn bend_persists_until_curve_diverges() {
        let note = shaped(60, 0, &[(0, 0, 3), (0, 4, 3), (0, 8, 3), (3, 12, 3), (0, 16, 3)]);
        let bent = bend_pitch(&note, 0, 4, 62, 0);
        assert_eq!(
            bent.pins,
            pins(&[(0, 0, 3), (2, 4, 3), (2, 8, 3), (3, 12, 3), (0, 16, 3)])
        );
    }

    #[test]
    fn bend_backwards_mirrors_forward() {
        let note = Note::new(60, 0, 12, 3);
        let bent = bend_pitch(&note, 12, 0, 57, 0);
        // Rebasing moves the bend into the pitch.
        assert_eq!(bent.pitches[0], 57);
        assert_eq!(bent.pins, pins(&[(0, 0, 3), (3, 12, 3)]));
    }

    #[test]
    fn bend_targets_one_chord_pitch() {
        let chord = Note::with_pins(&[60, 67], 0, 8, pins(&[(0, 0, 3), (0, 8, 3)]));
        let bent = bend_pitch(&chord, 0, 8, 69, 1);
        assert_eq!(bent.pins, pins(&[(0, 0, 3), (2, 8, 3)]));
    }

    #[test]
    fn size_bend_inserts_breakpoint() {
        let note = shaped(60, 0, &[(0, 0, 3), (4, 8, 3)]);
        let bent = bend_size(&note, 4, 1, None, false);
        assert_eq!(bent.pins, pins(&[(0, 0, 3), (2, 4, 1), (4, 8, 3)]));
    }

    #[test]
    fn size_bend_uniform_collapses() {
        let note = shaped(60, 0, &[(0, 0, 3), (0, 4, 1), (0, 8, 2)]);
        let flat = bend_size(&note, 4, 2, Some(0), true);
        assert_eq!(flat.pins, pins(&[(0, 0, 2), (0, 8, 2)]));
    }

    #[test]
    fn change_wrappers_undo_exactly() {
        let mut song = Song::with_channels(1, 0, 0);
        let note = shaped(60, 0, &[(0, 0, 3), (1, 6, 2), (0, 12, 3)]);
        song.channels[0].push_pattern_at(0, Pattern::with_notes(vec![note]));
        let at = NoteRef::new(0, 0, 0);
        let before = song.clone();

        let changes = [
            change_pin_time(&mut song, at, 1, 9, false),
            change_pitch_bend(&mut song, at, 0, 6, 65, 0),
            change_note_length(&mut song, at, 2, 10),
            change_size_bend(&mut song, at, 6, 0, None, false),
        ];
        for change in &changes {
            assert!(!change.is_noop());
        }
        assert_eq!(song.note(at).first_pin().interval, 0);
        for change in changes.iter().rev() {
            change.undo(&mut song);
        }
        assert_eq!(song, before);
    }
}
