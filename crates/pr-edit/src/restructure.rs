//! Bar and beat restructuring.
//!
//! Changing the bar length either splices notes at the new bar end,
//! stretches all timing by the beat ratio, or redistributes every note
//! across the new bar grid without losing any of it. The last is also how
//! the whole timeline is shifted by a number of parts.

use alloc::vec::Vec;

use pr_model::config::{clamp_beats_per_bar, BAR_COUNT_MIN, TEMPO_MAX, TEMPO_MIN};
use pr_model::{round_half_up, Channel, Edit, Note, NotePin, NoteRef, Pattern, Song, SongSettings};

use crate::change::{Change, ChangeGroup, ChangeSequence};
use crate::dedup::remove_duplicate_patterns;
use crate::notes::{change_note_truncate, remove_note};
use crate::pins::{expect_valid, normalize_pins};
use crate::projection::project_note_into_bar;

/// How notes are treated when the bar length changes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BeatsPerBarStrategy {
    /// Cut notes at the new bar end, discarding what falls past it.
    Splice,
    /// Scale all timing by the beat ratio and adjust the tempo to match.
    Stretch,
    /// Keep every note, carrying what no longer fits into the following bars.
    #[default]
    Overflow,
}

fn ceil_div(value: i32, divisor: i32) -> i32 {
    -((-value).div_euclid(divisor))
}

/// Rebuild every channel on a grid of `new_beats_per_bar` beats, with all
/// notes shifted by `parts_to_move` parts.
///
/// Notes are cut at the new bar lines and continuation fragments are merged
/// back together where a cut no longer falls on a bar line. Content shifted
/// before the first part is discarded. The bar count grows to hold
/// everything, the loop is carried over to the nearest whole bars, and
/// duplicate patterns are merged. The song is replaced in one step.
pub fn move_and_overflow_notes(song: &mut Song, new_beats_per_bar: i32, parts_to_move: i32) -> Change {
    let new_beats = clamp_beats_per_bar(new_beats_per_bar);
    let old_parts_per_bar = song.parts_per_bar();
    let new_parts_per_bar = song.parts_per_beat * new_beats;
    let old_bar_count = song.settings.bar_count;

    let mut last_end = 0;
    let mut channels: Vec<Channel> = Vec::with_capacity(song.channels.len());
    for old_channel in &song.channels {
        let mut channel = old_channel.empty_like();
        for old_bar in 0..old_bar_count {
            let Some(old_pattern) = old_channel.pattern_at(old_bar) else {
                continue;
            };
            let old_bar_start = old_bar as i32 * old_parts_per_bar;
            for note in &old_pattern.notes {
                let abs_start = note.start + old_bar_start + parts_to_move;
                let abs_end = note.end + old_bar_start + parts_to_move;
                if abs_end <= 0 {
                    continue;
                }
                last_end = last_end.max(abs_end);
                let first_bar = abs_start.div_euclid(new_parts_per_bar).max(0);
                let end_bar = ceil_div(abs_end, new_parts_per_bar);
                for bar in first_bar..end_bar {
                    let bar_start = bar * new_parts_per_bar;
                    let note_start_part = (abs_start - bar_start).max(0);
                    let note_end_part = (abs_end - bar_start).min(new_parts_per_bar);
                    if note_start_part >= note_end_part {
                        continue;
                    }
                    let bar = bar as usize;
                    let index = match channel.pattern_index(bar) {
                        Some(index) => index,
                        None => channel.push_pattern_at(bar, Pattern::new(&old_pattern.instruments)),
                    };
                    let time_offset = abs_start - bar_start - note_start_part;
                    project_note_into_bar(
                        note,
                        time_offset,
                        note_start_part,
                        note_end_part,
                        &mut channel.patterns[index].notes,
                    );
                }
            }
        }
        channels.push(channel);
    }

    let old_parts = old_bar_count as i32 * old_parts_per_bar;
    let covered = (old_parts + parts_to_move).max(last_end);
    let bar_count = (ceil_div(covered, new_parts_per_bar).max(0) as usize).max(BAR_COUNT_MIN);
    for channel in channels.iter_mut() {
        channel.bars.resize(bar_count, 0);
    }
    remove_duplicate_patterns(&mut channels);

    let mut settings = song.settings;
    let loop_start = settings.loop_start as i32 * old_parts_per_bar + parts_to_move;
    let loop_end = (settings.loop_start + settings.loop_length) as i32 * old_parts_per_bar + parts_to_move;
    let new_loop_start = loop_start.div_euclid(new_parts_per_bar).clamp(0, bar_count as i32 - 1);
    let new_loop_end = ceil_div(loop_end, new_parts_per_bar).clamp(new_loop_start + 1, bar_count as i32);
    settings.beats_per_bar = new_beats;
    settings.bar_count = bar_count;
    settings.loop_start = new_loop_start as usize;
    settings.loop_length = (new_loop_end - new_loop_start) as usize;

    log::debug!(
        "restructured {} channels: {} -> {} parts per bar, moved {} parts, {} -> {} bars",
        channels.len(),
        old_parts_per_bar,
        new_parts_per_bar,
        parts_to_move,
        old_bar_count,
        bar_count
    );

    let mut group = ChangeGroup::new();
    let old_channels = song.channels.clone();
    let old_settings = song.settings;
    group.perform(song, Edit::SetChannels { old: old_channels, new: channels });
    group.perform(song, Edit::SetSettings { old: old_settings, new: settings });
    group.into()
}

/// Change the number of beats per bar using `strategy`.
pub fn change_beats_per_bar(song: &mut Song, new_beats_per_bar: i32, strategy: BeatsPerBarStrategy) -> Change {
    let new_beats = clamp_beats_per_bar(new_beats_per_bar);
    let old_beats = song.settings.beats_per_bar;
    if new_beats == old_beats {
        return Change::none();
    }
    log::debug!("beats per bar {old_beats} -> {new_beats} ({strategy:?})");
    match strategy {
        BeatsPerBarStrategy::Splice => splice(song, new_beats),
        BeatsPerBarStrategy::Stretch => stretch(song, old_beats, new_beats),
        BeatsPerBarStrategy::Overflow => move_and_overflow_notes(song, new_beats, 0),
    }
}

fn set_beats(song: &mut Song, beats: i32, tempo: i32) -> Change {
    let old = song.settings;
    let new = SongSettings { beats_per_bar: beats, tempo, ..old };
    Change::perform(song, Edit::SetSettings { old, new })
}

fn splice(song: &mut Song, new_beats: i32) -> Change {
    let old_parts = song.parts_per_bar();
    let new_parts = song.parts_per_beat * new_beats;
    let mut group = ChangeGroup::new();
    if new_parts < old_parts {
        for channel in 0..song.channels.len() {
            for pattern in 0..song.channels[channel].patterns.len() {
                group.append(change_note_truncate(song, channel, pattern, new_parts, old_parts, None));
            }
        }
    }
    let tempo = song.settings.tempo;
    group.append(set_beats(song, new_beats, tempo));
    group.into()
}

/// Scale note timing by `new / old` beats, snapped to the rhythm grid.
fn stretch(song: &mut Song, old_beats: i32, new_beats: i32) -> Change {
    let step = song.parts_per_rhythm_step();
    let map = |time: i32| {
        let scaled = round_half_up(time as f64 * new_beats as f64 / old_beats as f64);
        round_half_up(scaled as f64 / step as f64) * step
    };

    let mut group = ChangeGroup::new();
    for channel in 0..song.channels.len() {
        for pattern in 0..song.channels[channel].patterns.len() {
            let sequence = ChangeSequence::over_notes(song, channel, pattern, |song, index, _| {
                let note = &song.pattern(channel, pattern).notes[index];
                match stretch_note(note, &map) {
                    Some(new) => {
                        let at = NoteRef::new(channel, pattern, index);
                        let old = note.clone();
                        Change::perform(song, Edit::SetNote { at, old, new })
                    }
                    None => remove_note(song, channel, pattern, index),
                }
            });
            group.append(sequence.into());
        }
    }

    let tempo = round_half_up(song.settings.tempo as f64 * new_beats as f64 / old_beats as f64)
        .clamp(TEMPO_MIN, TEMPO_MAX);
    group.append(set_beats(song, new_beats, tempo));
    group.into()
}

/// `note` with every time mapped through `map`, or `None` if it collapses.
///
/// Pins that land on the same part keep the earliest, so an interior pin
/// quantised onto the end replaces the end pin's interval and size.
fn stretch_note(note: &Note, map: impl Fn(i32) -> i32) -> Option<Note> {
    expect_valid(note);
    let start = map(note.start);
    let end = map(note.end);
    if end <= start {
        return None;
    }
    let pins = note
        .pins
        .iter()
        .map(|pin| NotePin::new(pin.interval, map(note.start + pin.time) - start, pin.size))
        .collect();
    let placed = Note { start, ..note.clone() };
    Some(normalize_pins(&placed, pins, None))
}
