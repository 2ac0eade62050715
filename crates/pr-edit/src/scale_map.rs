//! Pitch-class correspondence between two scales.

use alloc::vec;
use alloc::vec::Vec;
use arrayvec::ArrayVec;

use pr_model::{pitch_role, scale_degrees, ScaleFlags};

/// Old pitch class → new pitch class. Entries range over `0..=12`; 12 is the
/// root of the next octave up.
pub type ScaleMap = [i32; 12];

const ROLE_CHANGE_PENALTY: f64 = 0.75;
const SNAP_ROLE_PENALTY: f64 = 0.1;

/// Build the pitch-class map that carries music written in `old` into `new`.
///
/// The degrees of the smaller scale are matched to an ascending subset of
/// the larger one, root to root, minimising the total distance plus a
/// penalty for every pair whose harmonic role differs. Every chromatic pitch
/// class is then placed by linear interpolation between the matched degrees
/// and snapped to the nearest degree of the new scale, preferring one that
/// keeps its role. The root is treated as present in both scales.
pub fn generate_scale_map(old: &ScaleFlags, new: &ScaleFlags) -> ScaleMap {
    let mut old = *old;
    let mut new = *new;
    old[0] = true;
    new[0] = true;
    let old_scale = scale_degrees(&old);
    let new_scale = scale_degrees(&new);

    let larger_to_smaller = old_scale.len() > new_scale.len();
    let (smaller, larger) = if larger_to_smaller {
        (&new_scale, &old_scale)
    } else {
        (&old_scale, &new_scale)
    };

    let mut best_score = f64::MAX;
    let mut best: Vec<usize> = Vec::new();
    let mut stack: Vec<Vec<usize>> = vec![vec![0]];
    while let Some(indices) = stack.pop() {
        if indices.len() == smaller.len() {
            let score = indices.iter().enumerate().fold(0.0, |score, (i, &j)| {
                let penalty = if pitch_role(smaller[i]) != pitch_role(larger[j]) {
                    ROLE_CHANGE_PENALTY
                } else {
                    0.0
                };
                score + libm::fabs((smaller[i] - larger[j]) as f64) + penalty
            });
            if best_score > score {
                best_score = score;
                best = indices;
            }
        } else {
            let low = indices[indices.len() - 1] + 1;
            let high = larger.len() - smaller.len() + indices.len();
            for next in low..=high {
                let mut extended = indices.clone();
                extended.push(next);
                stack.push(extended);
            }
        }
    }

    // (old, new) breakpoints, closed with the next octave's root.
    let mut sparse: ArrayVec<(i32, i32), 13> = best
        .iter()
        .enumerate()
        .map(|(i, &j)| {
            if larger_to_smaller {
                (larger[j], smaller[i])
            } else {
                (smaller[i], larger[j])
            }
        })
        .collect();
    sparse.push((12, 12));
    let mut candidates: ArrayVec<i32, 13> = new_scale.iter().copied().collect();
    candidates.push(12);

    let mut map = [0; 12];
    let mut segment = 0;
    for old_pitch in 0..12 {
        let (old_low, new_low) = sparse[segment];
        let (old_high, new_high) = sparse[segment + 1];
        if old_pitch == old_high - 1 {
            segment += 1;
        }
        let target = (old_pitch - old_low) as f64 * (new_high - new_low) as f64
            / (old_high - old_low) as f64
            + new_low as f64;

        let mut nearest = 0;
        let mut nearest_distance = f64::MAX;
        for &candidate in &candidates {
            let mut distance = libm::fabs(candidate as f64 - target);
            if pitch_role(candidate) != pitch_role(old_pitch) {
                distance += SNAP_ROLE_PENALTY;
            }
            if nearest_distance > distance {
                nearest_distance = distance;
                nearest = candidate;
            }
        }
        map[old_pitch as usize] = nearest;
    }

    log::debug!("scale map {:?} -> {:?}: {:?}", old_scale.as_slice(), new_scale.as_slice(), map);
    map
}

/// Carry an absolute pitch through `map`, keeping its octave.
pub fn remap_pitch(map: &ScaleMap, pitch: i32) -> i32 {
    let pitch_class = pitch.rem_euclid(12);
    map[pitch_class as usize] + pitch - pitch_class
}
