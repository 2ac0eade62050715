//! Scales, expressed as twelve pitch-class flags, and the harmonic role of
//! each pitch class.

use arrayvec::ArrayVec;

/// Which of the twelve pitch classes (0 = key root) belong to a scale.
pub type ScaleFlags = [bool; 12];

/// A named scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scale {
    pub name: &'static str,
    pub flags: ScaleFlags,
}

const fn flags(bits: u16) -> ScaleFlags {
    let mut out = [false; 12];
    let mut i = 0;
    while i < 12 {
        out[i] = bits & (1 << (11 - i)) != 0;
        i += 1;
    }
    out
}

/// Preset scales. The last entry is the user-editable custom scale.
pub const SCALES: [Scale; 21] = [
    Scale { name: "Free", flags: flags(0b1111_1111_1111) },
    Scale { name: "Major", flags: flags(0b1010_1101_0101) },
    Scale { name: "Minor", flags: flags(0b1011_0101_1010) },
    Scale { name: "Mixolydian", flags: flags(0b1010_1101_0110) },
    Scale { name: "Lydian", flags: flags(0b1010_1011_0101) },
    Scale { name: "Dorian", flags: flags(0b1011_0101_0110) },
    Scale { name: "Phrygian", flags: flags(0b1101_0101_1010) },
    Scale { name: "Locrian", flags: flags(0b1101_0110_1010) },
    Scale { name: "Lydian Dominant", flags: flags(0b1010_1011_0110) },
    Scale { name: "Phrygian Dominant", flags: flags(0b1100_1101_1010) },
    Scale { name: "Harmonic Major", flags: flags(0b1010_1101_1001) },
    Scale { name: "Harmonic Minor", flags: flags(0b1011_0101_1001) },
    Scale { name: "Melodic Minor", flags: flags(0b1011_0101_0101) },
    Scale { name: "Blues", flags: flags(0b1001_0111_0010) },
    Scale { name: "Altered", flags: flags(0b1101_1010_1010) },
    Scale { name: "Major Pentatonic", flags: flags(0b1010_1001_0100) },
    Scale { name: "Minor Pentatonic", flags: flags(0b1001_0101_0010) },
    Scale { name: "Whole Tone", flags: flags(0b1010_1010_1010) },
    Scale { name: "Octatonic", flags: flags(0b1101_1011_0110) },
    Scale { name: "Hexatonic", flags: flags(0b1001_1001_1001) },
    Scale { name: "Custom", flags: flags(0b1111_1111_1111) },
];

/// Index of the custom scale in `SCALES`.
pub const SCALE_CUSTOM: usize = SCALES.len() - 1;

/// Index of the major scale in `SCALES`.
pub const SCALE_MAJOR: usize = 1;

/// Harmonic function of a pitch class relative to the key root.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PitchRole {
    Root,
    Second,
    Third,
    Fourth,
    Tritone,
    Fifth,
    Sixth,
    Seventh,
}

const ROLES: [PitchRole; 12] = [
    PitchRole::Root,
    PitchRole::Second,
    PitchRole::Second,
    PitchRole::Third,
    PitchRole::Third,
    PitchRole::Fourth,
    PitchRole::Tritone,
    PitchRole::Fifth,
    PitchRole::Sixth,
    PitchRole::Sixth,
    PitchRole::Seventh,
    PitchRole::Seventh,
];

/// Role of a pitch class. Wraps, so 12 is the root again.
pub fn pitch_role(pitch_class: i32) -> PitchRole {
    ROLES[pitch_class.rem_euclid(12) as usize]
}

/// The pitch classes present in a scale, ascending.
pub fn scale_degrees(flags: &ScaleFlags) -> ArrayVec<i32, 12> {
    flags
        .iter()
        .enumerate()
        .filter(|(_, on)| **on)
        .map(|(pc, _)| pc as i32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_contain_root() {
        for scale in SCALES {
            assert!(scale.flags[0], "{} lacks a root", scale.name);
        }
    }

    #[test]
    fn major_and_minor_degrees() {
        assert_eq!(scale_degrees(&SCALES[SCALE_MAJOR].flags).as_slice(), &[0, 2, 4, 5, 7, 9, 11]);
        assert_eq!(scale_degrees(&SCALES[2].flags).as_slice(), &[0, 2, 3, 5, 7, 8, 10]);
        assert_eq!(scale_degrees(&SCALES[13].flags).as_slice(), &[0, 3, 5, 6, 7, 10]);
    }

    #[test]
    fn roles_wrap_at_octave() {
        assert_eq!(pitch_role(0), PitchRole::Root);
        assert_eq!(pitch_role(12), PitchRole::Root);
        assert_eq!(pitch_role(6), PitchRole::Tritone);
        assert_eq!(pitch_role(-1), PitchRole::Seventh);
    }
}
