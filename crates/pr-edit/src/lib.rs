//! Undoable editing operations for the pinroll timeline.
//!
//! Every operation performs its mutation on the [`Song`](pr_model::Song)
//! immediately and returns a [`Change`] recording it. Callers store changes
//! that are not no-ops and replay them with `undo`/`redo`.
//!
//! Operations assume well-formed input notes; a corrupt note is a caller
//! bug and panics rather than being repaired.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod change;
mod dedup;
mod notes;
mod pins;
mod projection;
mod restructure;
mod scale;
mod scale_map;
mod selection;
mod settings;

pub use change::{Change, ChangeGroup, ChangeSequence};
pub use dedup::remove_duplicate_patterns;
pub use notes::{add_note, change_note_truncate, remove_note, split_note_at_points, split_notes_at_selection};
pub use pins::{
    bend_pitch, bend_size, change_note_length, change_pin_time, change_pitch_bend, change_size_bend,
    normalize_pins, resize_note, retime_pin,
};
pub use projection::project_note_into_bar;
pub use restructure::{change_beats_per_bar, move_and_overflow_notes, BeatsPerBarStrategy};
pub use scale::{change_pattern_scale, change_scale, remap_note};
pub use scale_map::{generate_scale_map, remap_pitch, ScaleMap};
pub use selection::PatternSelection;
pub use settings::{change_bar_count, change_key, change_loop, change_rhythm, change_tempo};
