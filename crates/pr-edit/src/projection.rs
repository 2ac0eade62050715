//! Carving a note into a window of a new bar layout.

use alloc::vec::Vec;

use pr_model::{interpolate_pin, remove_redundant_pins, Note, NotePin};

/// Project the part of `old` that falls inside `note_start_part..note_end_part`
/// of a new bar into `new_notes`.
///
/// `time_offset` is where the old note starts relative to the window start;
/// it is negative when the note began before the window. Pins outside the
/// window are replaced by boundary pins interpolated from the pair straddling
/// each edge.
///
/// A fragment opening a bar continues the previous bar when it was cut from
/// a running note or the source already continued. A later fragment of a
/// continuing source whose previous fragment ends right where it starts,
/// and sounds like its continuation, is merged into that fragment.
///
/// Panics on an empty window or when no pins land inside it.
pub fn project_note_into_bar(
    old: &Note,
    time_offset: i32,
    note_start_part: i32,
    note_end_part: i32,
    new_notes: &mut Vec<Note>,
) {
    let length = note_end_part - note_start_part;
    if length <= 0 {
        panic!("corrupt projection: empty window {note_start_part}..{note_end_part}");
    }

    let mut pins: Vec<NotePin> = Vec::with_capacity(old.pins.len() + 2);
    for (index, pin) in old.pins.iter().enumerate() {
        let time = pin.time + time_offset;
        if time < 0 {
            let Some(next) = old.pins.get(index + 1) else {
                panic!("corrupt projection: note ends before window at part {time}");
            };
            let next_time = next.time + time_offset;
            if next_time > 0 {
                let ratio = (-time) as f64 / (next_time - time) as f64;
                pins.push(interpolate_pin(pin, next, ratio, 0));
            }
        } else if time <= length {
            pins.push(NotePin::new(pin.interval, time, pin.size));
        } else {
            if index == 0 {
                panic!("corrupt projection: note starts after window at part {time}");
            }
            let prev = &old.pins[index - 1];
            let prev_time = prev.time + time_offset;
            if prev_time < length {
                let ratio = (length - prev_time) as f64 / (time - prev_time) as f64;
                pins.push(interpolate_pin(prev, pin, ratio, length));
            }
        }
    }
    if pins.is_empty() {
        panic!("corrupt projection: no pins inside window {note_start_part}..{note_end_part}");
    }

    let first_interval = pins[0].interval;
    let mut pitches = old.pitches.clone();
    for pitch in pitches.iter_mut() {
        *pitch += first_interval;
    }
    for pin in pins.iter_mut() {
        pin.interval -= first_interval;
    }

    let mut fragment = Note {
        pitches,
        pins,
        start: note_start_part,
        end: note_end_part,
        continues_last_pattern: false,
    };

    if note_start_part == 0 {
        fragment.continues_last_pattern = time_offset < 0 || old.continues_last_pattern;
    } else if old.continues_last_pattern {
        if let Some(prev) = new_notes.last_mut() {
            if prev.end == fragment.start && prev.is_continued_by(&fragment) {
                let bend = prev.last_pin().interval;
                let offset = prev.length();
                prev.pins
                    .extend(fragment.pins[1..].iter().map(|pin| pin.shifted(offset, bend)));
                prev.end = prev.start + prev.last_pin().time;
                remove_redundant_pins(&mut prev.pins);
                log::trace!("merged continuation into note ending at {}", prev.end);
                return;
            }
        }
    }

    new_notes.push(fragment);
}
