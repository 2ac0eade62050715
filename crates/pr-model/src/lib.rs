//! Timeline data model for the pinroll editing core.
//!
//! Notes with pin envelopes, patterns, channels with bar sequences, and
//! song-level timing. Every mutation the editing layer performs is expressed
//! as an [`Edit`] against these types.
//!
//! Designed to be `no_std` compatible with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod config;
mod edit;
mod error;
mod note;
mod pattern;
pub mod scale;
mod song;

pub use config::ChannelKind;
pub use edit::Edit;
pub use error::ModelError;
pub use note::{interpolate_pin, remove_redundant_pins, round_half_up, Note, NotePin, Pitches};
pub use pattern::{compare_pattern_notes, Pattern};
pub use scale::{pitch_role, scale_degrees, PitchRole, Scale, ScaleFlags, SCALES, SCALE_CUSTOM};
pub use song::{Channel, NoteRef, Song, SongSettings};
