//! Timing, pitch and size limits shared by the model and every edit.
//!
//! These stand in for the instrument/synthesis parameters of the host
//! application. The editing core only ever reads them.

/// Parts per beat. A part is the smallest addressable unit of time.
/// 24 is divisible by every supported rhythm (3, 4, 6, 8 steps per beat).
pub const PARTS_PER_BEAT: i32 = 24;

/// Largest pin size (volume) a note can carry.
pub const NOTE_SIZE_MAX: i32 = 3;

/// Maximum number of simultaneous pitches in one note.
pub const MAX_CHORD_SIZE: usize = 9;

pub const BEATS_PER_BAR_MIN: i32 = 1;
pub const BEATS_PER_BAR_MAX: i32 = 16;

pub const BAR_COUNT_MIN: usize = 1;
pub const BAR_COUNT_MAX: usize = 1024;

/// Tempo range in beats per minute.
pub const TEMPO_MIN: i32 = 30;
pub const TEMPO_MAX: i32 = 320;

/// Highest pitch a pitch channel can play (7 octaves).
pub const MAX_PITCH: i32 = 84;
/// Number of distinct drum pitches on a noise channel.
pub const DRUM_COUNT: i32 = 12;
/// Number of modulator slots on a mod channel.
pub const MOD_COUNT: i32 = 6;

/// Allowed rhythm grids, in steps per beat. 24 is freehand (one step per part).
pub const RHYTHM_STEPS: [i32; 5] = [3, 4, 6, 8, 24];

/// Default rhythm (index into `RHYTHM_STEPS`).
pub const DEFAULT_RHYTHM: usize = 1;

/// Kind of channel. Decides which pitch range notes may occupy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    /// Melodic channel.
    #[default]
    Pitch,
    /// Percussion channel; pitches select drums.
    Noise,
    /// Modulation channel; pitches select modulator slots.
    Mod,
}

impl ChannelKind {
    /// Highest pitch a note on this kind of channel may reach.
    pub const fn pitch_ceiling(self) -> i32 {
        match self {
            ChannelKind::Pitch => MAX_PITCH,
            ChannelKind::Noise => DRUM_COUNT - 1,
            ChannelKind::Mod => MOD_COUNT - 1,
        }
    }

    /// Whether scale and key edits apply to this channel.
    pub const fn is_pitched(self) -> bool {
        matches!(self, ChannelKind::Pitch)
    }
}

/// Clamp a beats-per-bar value into the supported range.
pub fn clamp_beats_per_bar(beats: i32) -> i32 {
    beats.clamp(BEATS_PER_BAR_MIN, BEATS_PER_BAR_MAX)
}
