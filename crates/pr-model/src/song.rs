//! Song, channel and timing types.

use alloc::vec::Vec;

use crate::config::{ChannelKind, DEFAULT_RHYTHM, PARTS_PER_BEAT, RHYTHM_STEPS};
use crate::error::ModelError;
use crate::note::Note;
use crate::pattern::Pattern;
use crate::scale::{ScaleFlags, SCALES, SCALE_CUSTOM, SCALE_MAJOR};

/// Song-wide settings that simple edits replace as one value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SongSettings {
    /// Beats in one bar (BEATS_PER_BAR_MIN..=BEATS_PER_BAR_MAX)
    pub beats_per_bar: i32,
    /// Number of bars in every channel
    pub bar_count: usize,
    /// Key root as a pitch class (0 = C)
    pub key: i32,
    /// Index into `SCALES`
    pub scale: usize,
    /// Flags used when `scale == SCALE_CUSTOM`
    pub scale_custom: ScaleFlags,
    /// Tempo in BPM
    pub tempo: i32,
    /// Index into `RHYTHM_STEPS`
    pub rhythm: usize,
    /// First looped bar
    pub loop_start: usize,
    /// Number of looped bars (at least 1)
    pub loop_length: usize,
}

impl Default for SongSettings {
    fn default() -> Self {
        Self {
            beats_per_bar: 8,
            bar_count: 16,
            key: 0,
            scale: SCALE_MAJOR,
            scale_custom: SCALES[SCALE_CUSTOM].flags,
            tempo: 150,
            rhythm: DEFAULT_RHYTHM,
            loop_start: 0,
            loop_length: 4,
        }
    }
}

/// One channel: a pool of patterns and the bar sequence pointing into it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Channel {
    pub kind: ChannelKind,
    pub octave: u8,
    pub muted: bool,
    /// Pattern pool
    pub patterns: Vec<Pattern>,
    /// Per bar: pattern number, 1-based into `patterns`; 0 = empty bar
    pub bars: Vec<usize>,
}

impl Channel {
    /// An empty channel with `bar_count` empty bars.
    pub fn new(kind: ChannelKind, bar_count: usize) -> Self {
        Self {
            kind,
            octave: 3,
            muted: false,
            patterns: Vec::new(),
            bars: alloc::vec![0; bar_count],
        }
    }

    /// A channel with the same kind and mixer settings but no patterns or bars.
    pub fn empty_like(&self) -> Self {
        Self {
            kind: self.kind,
            octave: self.octave,
            muted: self.muted,
            patterns: Vec::new(),
            bars: Vec::new(),
        }
    }

    /// Index into `patterns` of the pattern playing at `bar`.
    pub fn pattern_index(&self, bar: usize) -> Option<usize> {
        match self.bars.get(bar) {
            Some(&number) if number > 0 => Some(number - 1),
            _ => None,
        }
    }

    /// Pattern playing at `bar`, if any.
    pub fn pattern_at(&self, bar: usize) -> Option<&Pattern> {
        self.pattern_index(bar).and_then(|i| self.patterns.get(i))
    }

    /// Add a pattern to the pool and point `bar` at it, growing `bars` with
    /// empty entries as needed. Returns the pattern's index.
    pub fn push_pattern_at(&mut self, bar: usize, pattern: Pattern) -> usize {
        self.patterns.push(pattern);
        if self.bars.len() <= bar {
            self.bars.resize(bar + 1, 0);
        }
        self.bars[bar] = self.patterns.len();
        self.patterns.len() - 1
    }

    pub fn validate(&self, bar_count: usize, bar_length: i32) -> Result<(), ModelError> {
        if self.bars.len() != bar_count {
            return Err(ModelError::BarCount { bars: self.bars.len(), bar_count });
        }
        for (bar, &number) in self.bars.iter().enumerate() {
            if number > self.patterns.len() {
                return Err(ModelError::MissingPattern {
                    bar,
                    pattern: number,
                    count: self.patterns.len(),
                });
            }
        }
        let ordered = self.kind != ChannelKind::Mod;
        for pattern in &self.patterns {
            pattern.validate(bar_length, ordered)?;
        }
        Ok(())
    }
}

/// Address of a note: channel index, pattern index in the channel's pool,
/// note index in the pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NoteRef {
    pub channel: usize,
    pub pattern: usize,
    pub note: usize,
}

impl NoteRef {
    pub const fn new(channel: usize, pattern: usize, note: usize) -> Self {
        Self { channel, pattern, note }
    }
}

/// A complete song.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Song {
    pub settings: SongSettings,
    /// Parts per beat; fixed for the life of the song
    pub parts_per_beat: i32,
    /// Channels, in order: pitch, then noise, then mod
    pub channels: Vec<Channel>,
}

impl Default for Song {
    fn default() -> Self {
        Self {
            settings: SongSettings::default(),
            parts_per_beat: PARTS_PER_BEAT,
            channels: Vec::new(),
        }
    }
}

impl Song {
    /// Create a song with the given channel counts and default settings.
    pub fn with_channels(pitch: usize, noise: usize, modulation: usize) -> Self {
        let mut song = Self::default();
        let bars = song.settings.bar_count;
        let kinds = core::iter::repeat(ChannelKind::Pitch)
            .take(pitch)
            .chain(core::iter::repeat(ChannelKind::Noise).take(noise))
            .chain(core::iter::repeat(ChannelKind::Mod).take(modulation));
        song.channels = kinds.map(|kind| Channel::new(kind, bars)).collect();
        song
    }

    /// Length of one bar in parts.
    pub fn parts_per_bar(&self) -> i32 {
        self.parts_per_beat * self.settings.beats_per_bar
    }

    /// Parts between two steps of the current rhythm.
    pub fn parts_per_rhythm_step(&self) -> i32 {
        let steps = RHYTHM_STEPS[self.settings.rhythm.min(RHYTHM_STEPS.len() - 1)];
        (self.parts_per_beat / steps).max(1)
    }

    /// The active scale's flags.
    pub fn scale_flags(&self) -> ScaleFlags {
        if self.settings.scale == SCALE_CUSTOM {
            self.settings.scale_custom
        } else {
            SCALES[self.settings.scale].flags
        }
    }

    /// Pattern playing in `channel` at `bar`, if any.
    pub fn pattern_at(&self, channel: usize, bar: usize) -> Option<&Pattern> {
        self.channels.get(channel).and_then(|c| c.pattern_at(bar))
    }

    pub fn pattern(&self, channel: usize, pattern: usize) -> &Pattern {
        &self.channels[channel].patterns[pattern]
    }

    pub fn pattern_mut(&mut self, channel: usize, pattern: usize) -> &mut Pattern {
        &mut self.channels[channel].patterns[pattern]
    }

    pub fn note(&self, at: NoteRef) -> &Note {
        &self.channels[at.channel].patterns[at.pattern].notes[at.note]
    }

    pub fn note_mut(&mut self, at: NoteRef) -> &mut Note {
        &mut self.channels[at.channel].patterns[at.pattern].notes[at.note]
    }

    /// Check the whole document.
    pub fn validate(&self) -> Result<(), ModelError> {
        let bar_length = self.parts_per_bar();
        for (index, channel) in self.channels.iter().enumerate() {
            channel
                .validate(self.settings.bar_count, bar_length)
                .map_err(|e| e.in_channel(index, "bars"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NOTE_SIZE_MAX;

    fn make_test_song() -> Song {
        let mut song = Song::with_channels(2, 1, 0);
        let first = Pattern::with_notes(vec![Note::new(60, 0, 24, NOTE_SIZE_MAX)]);
        let second = Pattern::with_notes(vec![Note::new(64, 48, 96, NOTE_SIZE_MAX)]);
        song.channels[0].push_pattern_at(0, first);
        song.channels[0].push_pattern_at(2, second);
        song
    }

    #[test]
    fn with_channels_orders_kinds() {
        let song = Song::with_channels(2, 1, 1);
        let kinds: Vec<_> = song.channels.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![ChannelKind::Pitch, ChannelKind::Pitch, ChannelKind::Noise, ChannelKind::Mod]
        );
        for channel in &song.channels {
            assert_eq!(channel.bars.len(), song.settings.bar_count);
        }
    }

    #[test]
    fn bars_point_one_based() {
        let song = make_test_song();
        assert_eq!(song.channels[0].bars[..4], [1, 0, 2, 0]);
        assert_eq!(song.channels[0].pattern_index(2), Some(1));
        assert!(song.pattern_at(0, 1).is_none());
        assert_eq!(song.pattern_at(0, 2).map(|p| p.notes[0].pitches[0]), Some(64));
        assert!(song.pattern_at(7, 0).is_none());
    }

    #[test]
    fn timing_helpers() {
        let song = Song::default();
        assert_eq!(song.parts_per_bar(), 8 * PARTS_PER_BEAT);
        assert_eq!(song.parts_per_rhythm_step(), PARTS_PER_BEAT / 4);
        assert_eq!(song.scale_flags(), SCALES[SCALE_MAJOR].flags);
    }

    #[test]
    fn validate_whole_song() {
        let mut song = make_test_song();
        assert_eq!(song.validate(), Ok(()));

        song.channels[1].bars.push(0);
        assert!(matches!(
            song.validate(),
            Err(ModelError::InChannel { channel: 1, .. })
        ));
        song.channels[1].bars.pop();

        song.channels[0].bars[3] = 9;
        assert!(song.validate().is_err());
    }

    #[test]
    fn note_ref_addresses_pool() {
        let mut song = make_test_song();
        let at = NoteRef::new(0, 1, 0);
        assert_eq!(song.note(at).start, 48);
        song.note_mut(at).continues_last_pattern = true;
        assert!(song.pattern(0, 1).notes[0].continues_last_pattern);
    }
}
