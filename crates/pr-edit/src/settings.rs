//! Song-wide settings edits.

use pr_model::config::{BAR_COUNT_MAX, BAR_COUNT_MIN, RHYTHM_STEPS, TEMPO_MAX, TEMPO_MIN};
use pr_model::{Edit, Song, SongSettings};

use crate::change::{Change, ChangeGroup};

fn set_settings(song: &mut Song, new: SongSettings) -> Change {
    let old = song.settings;
    Change::perform(song, Edit::SetSettings { old, new })
}

/// Keep the loop inside `bar_count` bars and at least one bar long.
fn clamp_loop(settings: &mut SongSettings) {
    let bars = settings.bar_count.max(1);
    settings.loop_start = settings.loop_start.min(bars - 1);
    settings.loop_length = settings.loop_length.clamp(1, bars - settings.loop_start);
}

pub fn change_tempo(song: &mut Song, tempo: i32) -> Change {
    let tempo = tempo.clamp(TEMPO_MIN, TEMPO_MAX);
    let settings = SongSettings { tempo, ..song.settings };
    set_settings(song, settings)
}

/// Set the key root; wraps into one octave.
pub fn change_key(song: &mut Song, key: i32) -> Change {
    let key = key.rem_euclid(12);
    let settings = SongSettings { key, ..song.settings };
    set_settings(song, settings)
}

pub fn change_loop(song: &mut Song, loop_start: usize, loop_length: usize) -> Change {
    let mut settings = SongSettings { loop_start, loop_length, ..song.settings };
    clamp_loop(&mut settings);
    set_settings(song, settings)
}

/// Select a rhythm grid by index into `RHYTHM_STEPS`.
pub fn change_rhythm(song: &mut Song, rhythm: usize) -> Change {
    let rhythm = rhythm.min(RHYTHM_STEPS.len() - 1);
    let settings = SongSettings { rhythm, ..song.settings };
    set_settings(song, settings)
}

/// Resize the song to `bar_count` bars, adding or removing bars at the
/// beginning when `at_beginning` is set and at the end otherwise.
///
/// Patterns left without a bar stay in their channel's pool.
pub fn change_bar_count(song: &mut Song, bar_count: usize, at_beginning: bool) -> Change {
    let bar_count = bar_count.clamp(BAR_COUNT_MIN, BAR_COUNT_MAX);
    let old_count = song.settings.bar_count;
    if bar_count == old_count {
        return Change::none();
    }

    let mut channels = song.channels.clone();
    for channel in channels.iter_mut() {
        if at_beginning {
            if bar_count > old_count {
                let mut bars = alloc::vec![0; bar_count - old_count];
                bars.append(&mut channel.bars);
                channel.bars = bars;
            } else {
                channel.bars.drain(..old_count - bar_count);
            }
        } else {
            channel.bars.resize(bar_count, 0);
        }
    }

    let mut settings = SongSettings { bar_count, ..song.settings };
    if at_beginning {
        let shifted = settings.loop_start as isize + bar_count as isize - old_count as isize;
        settings.loop_start = shifted.max(0) as usize;
    }
    clamp_loop(&mut settings);
    log::debug!("bar count {old_count} -> {bar_count}, loop {}+{}", settings.loop_start, settings.loop_length);

    let mut group = ChangeGroup::new();
    let old_channels = song.channels.clone();
    group.perform(song, Edit::SetChannels { old: old_channels, new: channels });
    group.append(set_settings(song, settings));
    group.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pr_model::{Note, Pattern};

    #[test]
    fn simple_settings_clamp_and_wrap() {
        let mut song = Song::default();
        change_tempo(&mut song, 1000);
        assert_eq!(song.settings.tempo, TEMPO_MAX);
        change_key(&mut song, -1);
        assert_eq!(song.settings.key, 11);
        change_rhythm(&mut song, 99);
        assert_eq!(song.settings.rhythm, RHYTHM_STEPS.len() - 1);
        change_loop(&mut song, 20, 8);
        assert_eq!((song.settings.loop_start, song.settings.loop_length), (15, 1));
    }

    #[test]
    fn unchanged_value_is_noop() {
        let mut song = Song::default();
        let tempo = song.settings.tempo;
        assert!(change_tempo(&mut song, tempo).is_noop());
        assert!(change_bar_count(&mut song, 16, false).is_noop());
    }

    #[test]
    fn bar_count_at_end() {
        let mut song = Song::with_channels(1, 0, 0);
        song.channels[0].push_pattern_at(10, Pattern::with_notes(vec![Note::new(60, 0, 4, 3)]));
        let before = song.clone();

        let change = change_bar_count(&mut song, 8, false);
        assert_eq!(song.settings.bar_count, 8);
        assert_eq!(song.channels[0].bars, vec![0; 8]);
        assert_eq!(song.channels[0].patterns.len(), 1);
        assert_eq!(song.validate(), Ok(()));

        change.undo(&mut song);
        assert_eq!(song, before);
    }

    #[test]
    fn bar_count_at_beginning_shifts_bars_and_loop() {
        let mut song = Song::with_channels(1, 0, 0);
        song.settings.loop_start = 2;
        song.settings.loop_length = 2;
        song.channels[0].push_pattern_at(0, Pattern::with_notes(vec![Note::new(60, 0, 4, 3)]));

        change_bar_count(&mut song, 18, true);
        assert_eq!(song.channels[0].bars[..3], [0, 0, 1]);
        assert_eq!(song.settings.loop_start, 4);

        change_bar_count(&mut song, 15, true);
        assert_eq!(song.channels[0].bars.len(), 15);
        assert_eq!(song.channels[0].bars[0], 0);
        assert_eq!(song.settings.loop_start, 1);
        assert_eq!(song.validate(), Ok(()));
    }
}
