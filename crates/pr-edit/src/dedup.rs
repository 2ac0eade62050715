//! Pattern canonicalization.

use alloc::vec::Vec;

use pr_model::{Channel, Pattern};

/// Rebuild each channel's pattern pool so that bars with identical content
/// share one pattern.
///
/// Bars are walked in order; a referenced pattern is kept only if no kept
/// pattern has the same instrument set and notes. Patterns no bar references
/// are dropped. Channel pools are small, so this is a plain linear scan.
pub fn remove_duplicate_patterns(channels: &mut [Channel]) {
    for (index, channel) in channels.iter_mut().enumerate() {
        let old = core::mem::take(&mut channel.patterns);
        let mut unique: Vec<Pattern> = Vec::with_capacity(old.len());
        let mut merged = 0usize;
        for bar in channel.bars.iter_mut() {
            if *bar == 0 {
                continue;
            }
            let pattern = &old[*bar - 1];
            match unique.iter().position(|kept| kept.same_content(pattern)) {
                Some(existing) => {
                    merged += 1;
                    *bar = existing + 1;
                }
                None => {
                    unique.push(pattern.clone());
                    *bar = unique.len();
                }
            }
        }
        log::debug!(
            "channel {index}: kept {} of {} patterns, {merged} bars repointed",
            unique.len(),
            old.len()
        );
        channel.patterns = unique;
    }
}
