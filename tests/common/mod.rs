//! Shared helpers for the integration tests: seeded random songs and a flat
//! per-part view of a channel.

#![allow(dead_code)]

use pinroll::pr_edit::bend_pitch;
use pinroll::pr_model::Pitches;
use pinroll::{Note, NotePin, NoteRef, Pattern, Song};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Two pitch channels and a noise channel of flat notes on a six-part grid.
///
/// Some bars are empty, some reuse the previous bar's pattern, and notes
/// opening a bar sometimes continue the previous bar's last note.
pub fn random_song(rng: &mut ChaCha8Rng) -> Song {
    let mut song = Song::with_channels(2, 1, 0);
    let bar_count = rng.random_range(1..=6);
    song.settings.beats_per_bar = rng.random_range(1..=8);
    song.settings.bar_count = bar_count;
    song.settings.loop_start = 0;
    song.settings.loop_length = bar_count;
    let bar_length = song.parts_per_bar();

    for channel in song.channels.iter_mut() {
        let ceiling = channel.kind.pitch_ceiling();
        channel.bars = vec![0; bar_count];
        let mut carry: Option<Note> = None;
        for bar in 0..bar_count {
            if rng.random_bool(0.15) {
                carry = None;
                continue;
            }
            if bar > 0 && channel.bars[bar - 1] != 0 && rng.random_bool(0.2) {
                channel.bars[bar] = channel.bars[bar - 1];
                continue;
            }

            let mut notes: Vec<Note> = Vec::new();
            let mut time = rng.random_range(0..3) * 6;
            while time < bar_length {
                let end = (time + rng.random_range(1..=4) * 6).min(bar_length);
                let base = rng.random_range(0..=ceiling - 4);
                let pitches: Vec<i32> = if rng.random_bool(0.3) { vec![base, base + 4] } else { vec![base] };
                let pins = vec![NotePin::new(0, 0, 3), NotePin::new(0, end - time, 3)];
                let mut note = Note::with_pins(&pitches, time, end, pins);
                if time == 0 && rng.random_bool(0.4) {
                    note.continues_last_pattern = true;
                    if let Some(prev) = &carry {
                        note.pitches = prev.pitches.clone();
                    }
                }
                notes.push(note);
                time = end + rng.random_range(0..2) * 6;
            }
            carry = notes.last().filter(|n| n.end == bar_length).cloned();
            channel.push_pattern_at(bar, Pattern::with_notes(notes));
        }
    }
    song
}

/// [`random_song`] with every pitched note bent upward over its length.
///
/// Notes continuing a bent note start on the pitch it bent to, so they can
/// be merged back into it.
pub fn random_bent_song(rng: &mut ChaCha8Rng) -> Song {
    let mut song = random_song(rng);
    let bar_length = song.parts_per_bar();
    for channel in song.channels.iter_mut().filter(|c| c.kind.is_pitched()) {
        let ceiling = channel.kind.pitch_ceiling();
        for pattern in channel.patterns.iter_mut() {
            for note in pattern.notes.iter_mut() {
                let top = note.pitches.iter().copied().max().unwrap_or(ceiling);
                let bend = rng.random_range(1..=3).min(ceiling - top);
                if bend > 0 {
                    let bent = bend_pitch(note, note.start, note.end, note.pitches[0] + bend, 0);
                    *note = bent;
                }
            }
        }

        for bar in 1..channel.bars.len() {
            let carried = channel
                .pattern_at(bar - 1)
                .and_then(|prev| prev.notes.last())
                .filter(|last| last.end == bar_length)
                .map(|last| {
                    let bend = last.last_pin().interval;
                    last.pitches.iter().map(|p| p + bend).collect::<Pitches>()
                });
            let (Some(pitches), Some(index)) = (carried, channel.pattern_index(bar)) else {
                continue;
            };
            if let Some(first) = channel.patterns[index].notes.first_mut().filter(|n| n.continues_last_pattern) {
                first.pitches = pitches;
            }
        }
    }
    song
}

/// Every sounded part of a channel as `(absolute part, sorted base pitches)`.
pub fn timeline(song: &Song, channel: usize) -> Vec<(i32, Vec<i32>)> {
    let bar_length = song.parts_per_bar();
    let mut parts = Vec::new();
    for bar in 0..song.settings.bar_count {
        let Some(pattern) = song.pattern_at(channel, bar) else {
            continue;
        };
        for note in &pattern.notes {
            let mut pitches = note.pitches.to_vec();
            pitches.sort_unstable();
            for part in note.start..note.end {
                parts.push((bar as i32 * bar_length + part, pitches.clone()));
            }
        }
    }
    parts.sort();
    parts
}

/// Addresses of every note in every pattern pool.
pub fn all_notes(song: &Song) -> Vec<NoteRef> {
    let mut refs = Vec::new();
    for (c, channel) in song.channels.iter().enumerate() {
        for (p, pattern) in channel.patterns.iter().enumerate() {
            for n in 0..pattern.notes.len() {
                refs.push(NoteRef::new(c, p, n));
            }
        }
    }
    refs
}
