// Alphabet generators.
//
// Besides a plain interval list (fed straight to `build_tree`), two derived
// alphabets are supported:
// - interval/duration pairs: every interval paired with each duration
//   multiplier, durations in the outer loop, so the whole interval list
//   appears once per duration;
// - character ranking: the characters of a text ordered by ascending
//   frequency, ties kept in order of first appearance.
//
// Both reuse the codeword rule from tree.rs unchanged.

use crate::bits::strip_separators;
use crate::error::CodecError;
use crate::tree::{CodeTree, build_tree};
use serde::{Deserialize, Serialize};

/// Duration multipliers paired with each interval by default, in beats.
pub const DEFAULT_DURATIONS: [f64; 2] = [0.5, 1.0];

/// A pitch-class interval with the duration it should sound for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedInterval {
    /// Semitones above the reference pitch class (0-11 for scale intervals).
    pub interval: i32,
    /// Duration in quarter-note beats.
    pub duration: f64,
}

impl TimedInterval {
    pub fn new(interval: i32, duration: f64) -> Self {
        TimedInterval { interval, duration }
    }
}

/// Every interval paired with every duration, durations outermost.
pub fn duration_alphabet(intervals: &[i32], durations: &[f64]) -> Vec<TimedInterval> {
    durations
        .iter()
        .flat_map(|&d| intervals.iter().map(move |&i| TimedInterval::new(i, d)))
        .collect()
}

/// Characters of `text` (separators removed) ranked by ascending count.
///
/// Each distinct character appears once. Characters with equal counts keep
/// the order in which they first appear in the text.
pub fn occurrence_alphabet(text: &str) -> Vec<char> {
    let mut counts: Vec<(char, usize)> = Vec::new();
    for ch in strip_separators(text).chars() {
        match counts.iter_mut().find(|(c, _)| *c == ch) {
            Some((_, n)) => *n += 1,
            None => counts.push((ch, 1)),
        }
    }
    // sort_by_key is stable, which is what keeps ties in first-seen order.
    counts.sort_by_key(|&(_, n)| n);
    counts.into_iter().map(|(c, _)| c).collect()
}

/// Code tree over the interval/duration product.
pub fn build_duration_tree(
    intervals: &[i32],
    durations: &[f64],
) -> Result<CodeTree<TimedInterval>, CodecError> {
    build_tree(duration_alphabet(intervals, durations))
}

/// Code tree over the characters of `text`, rarest first.
pub fn build_occurrence_tree(text: &str) -> Result<CodeTree<char>, CodecError> {
    build_tree(occurrence_alphabet(text))
}
