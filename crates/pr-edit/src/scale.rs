//! Applying a scale map to notes, patterns and the whole song.

use alloc::vec::Vec;

use pr_model::{remove_redundant_pins, Edit, Note, NotePin, NoteRef, Pitches, ScaleFlags, Song};

use crate::change::{Change, ChangeGroup};
use crate::notes::split_notes_at_selection;
use crate::pins::expect_valid;
use crate::scale_map::{generate_scale_map, remap_pitch, ScaleMap};
use crate::selection::PatternSelection;

/// `note` with every pitch and pin carried through `map`.
///
/// Pitches that land on the same value are merged. Pin intervals are turned
/// into absolute pitches, clamped to `0..=pitch_ceiling`, remapped, and made
/// relative to the new first pitch again.
pub fn remap_note(note: &Note, map: &ScaleMap, pitch_ceiling: i32) -> Note {
    expect_valid(note);
    let mut pitches = Pitches::new();
    for &pitch in &note.pitches {
        let pitch = remap_pitch(map, pitch);
        if !pitches.contains(&pitch) {
            pitches.push(pitch);
        }
    }

    let base = note.pitches[0];
    let mut pins: Vec<NotePin> = note
        .pins
        .iter()
        .map(|pin| {
            let pitch = (base + pin.interval).clamp(0, pitch_ceiling);
            NotePin::new(remap_pitch(map, pitch) - pitches[0], pin.time, pin.size)
        })
        .collect();
    if pins[0].interval != 0 {
        panic!("corrupt note: first pin interval {} after scale remap", pins[0].interval);
    }
    remove_redundant_pins(&mut pins);

    Note { pitches, pins, ..note.clone() }
}

/// Remap the notes of one pattern through `map`.
///
/// With a selection, notes crossing its edges are split first and only notes
/// inside it are touched.
pub fn change_pattern_scale(
    song: &mut Song,
    channel: usize,
    pattern: usize,
    map: &ScaleMap,
    selection: Option<PatternSelection>,
) -> Change {
    let mut group = ChangeGroup::new();
    if let Some(selection) = selection {
        group.append(split_notes_at_selection(song, channel, pattern, selection));
    }
    let ceiling = song.channels[channel].kind.pitch_ceiling();
    for index in 0..song.pattern(channel, pattern).notes.len() {
        let at = NoteRef::new(channel, pattern, index);
        let old = song.note(at);
        if selection.is_some_and(|selection| !selection.overlaps(old)) {
            continue;
        }
        let new = remap_note(old, map, ceiling);
        let old = old.clone();
        group.perform(song, Edit::SetNote { at, old, new });
    }
    group.into()
}

/// Switch the song to scale `scale` (an index into `SCALES`), with `custom`
/// replacing the custom scale's flags when given.
///
/// With `remap`, every pattern of every pitched channel is carried from the
/// old scale into the new one.
pub fn change_scale(song: &mut Song, scale: usize, custom: Option<ScaleFlags>, remap: bool) -> Change {
    let old_flags = song.scale_flags();
    let old_settings = song.settings;
    let mut settings = old_settings;
    settings.scale = scale.min(pr_model::SCALE_CUSTOM);
    if let Some(flags) = custom {
        settings.scale_custom = flags;
    }

    let mut group = ChangeGroup::new();
    group.perform(song, Edit::SetSettings { old: old_settings, new: settings });
    if remap {
        let map = generate_scale_map(&old_flags, &song.scale_flags());
        for channel in 0..song.channels.len() {
            if !song.channels[channel].kind.is_pitched() {
                continue;
            }
            for pattern in 0..song.channels[channel].patterns.len() {
                group.append(change_pattern_scale(song, channel, pattern, &map, None));
            }
        }
    }
    group.into()
}
