// Nearest-octave folding of decoded pitch classes.
//
// Decoded intervals are pitch classes relative to a reference pitch. To keep
// the melody from leaping, each one is placed in whichever of three octaves
// lands closest to the previously emitted note: the class itself, an octave
// below, or an octave above. Candidates are considered in that fixed order
// and a later candidate wins an exact distance tie, so `p + 12` beats
// `p - 12` beats `p`. The first note is measured against 0.
//
// Example: [7, 0, 7, 0] folds to [-5, 0, -5, 0] (7 is 7 away from 0 but -5
// is only 5 away; from -5, 0 is 5 away and -12 is 7 away).

use crate::alphabet::TimedInterval;

/// Semitones in an octave.
pub const OCTAVE: i32 = 12;

/// Stateful folder holding the previously emitted pitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OctaveFolder {
    previous: i32,
}

impl OctaveFolder {
    /// Folder whose first note is measured against 0.
    pub fn new() -> Self {
        OctaveFolder::default()
    }

    /// The last emitted pitch (0 before the first call).
    pub fn previous(&self) -> i32 {
        self.previous
    }

    /// Fold one pitch class and remember the result.
    ///
    /// Candidates saturate at the ends of the `i32` range and distances are
    /// measured in `i64`, so no symbol can overflow.
    pub fn fold(&mut self, pitch_class: i32) -> i32 {
        let candidates = [
            pitch_class,
            pitch_class.saturating_sub(OCTAVE),
            pitch_class.saturating_add(OCTAVE),
        ];
        let distance_to = |c: i32| (i64::from(c) - i64::from(self.previous)).abs();
        let mut best = candidates[0];
        let mut best_distance = distance_to(best);
        for &candidate in &candidates[1..] {
            let distance = distance_to(candidate);
            // `<=`: ties go to the later candidate.
            if distance <= best_distance {
                best = candidate;
                best_distance = distance;
            }
        }
        self.previous = best;
        best
    }
}

/// Iterator adapter folding each pitch class of `inner` in order.
#[derive(Debug, Clone)]
pub struct FoldOctaves<I> {
    inner: I,
    folder: OctaveFolder,
}

impl<I: Iterator<Item = i32>> Iterator for FoldOctaves<I> {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        self.inner.next().map(|p| self.folder.fold(p))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Fold a pitch-class sequence, starting from 0.
pub fn fold_octaves<I: IntoIterator<Item = i32>>(pitch_classes: I) -> FoldOctaves<I::IntoIter> {
    FoldOctaves {
        inner: pitch_classes.into_iter(),
        folder: OctaveFolder::new(),
    }
}

/// Fold the intervals of timed symbols, keeping each duration as is.
pub fn fold_timed<I: IntoIterator<Item = TimedInterval>>(
    symbols: I,
) -> impl Iterator<Item = TimedInterval> {
    let mut folder = OctaveFolder::new();
    symbols
        .into_iter()
        .map(move |s| TimedInterval::new(folder.fold(s.interval), s.duration))
}
