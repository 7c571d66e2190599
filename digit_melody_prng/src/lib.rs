// Deterministic, portable pseudo-random number generator.
//
// Implements xoshiro256++ (Blackman & Vigna, 2019) with SplitMix64 seeding.
// The only consumer is the MIDI renderer in `digit_melody_music`, which draws
// per-note durations from a small fixed set when a voice is rendered with
// random durations. Everything else in the workspace is fully deterministic
// without a generator.
//
// **Critical constraint: determinism.** Given a seed, a `NoteRng` must produce
// the same stream on every platform so that `render --seed N` always writes
// the same file. No floating point in the generator itself.

use rand::RngCore;
use rand::rngs::OsRng;

/// Xoshiro256++ PRNG used to pick note durations.
#[derive(Clone, Debug)]
pub struct NoteRng {
    s: [u64; 4],
}

impl NoteRng {
    /// Create a new PRNG seeded from a `u64`.
    ///
    /// Uses SplitMix64 to expand the seed into the 256-bit internal state.
    pub fn new(seed: u64) -> Self {
        let mut sm = seed;
        Self {
            s: [
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
            ],
        }
    }

    /// Create a PRNG seeded from OS randomness, for unseeded renders.
    pub fn from_entropy() -> Self {
        Self::new(OsRng.next_u64())
    }

    /// Generate the next `u64` in the sequence.
    pub fn next_u64(&mut self) -> u64 {
        let result = (self.s[0].wrapping_add(self.s[3]))
            .rotate_left(23)
            .wrapping_add(self.s[0]);

        let t = self.s[1] << 17;

        self.s[2] ^= self.s[0];
        self.s[3] ^= self.s[1];
        self.s[1] ^= self.s[2];
        self.s[0] ^= self.s[3];

        self.s[2] ^= t;
        self.s[3] = self.s[3].rotate_left(45);

        result
    }

    /// Generate a uniform random `usize` in `[low, high)`.
    ///
    /// Rejection sampling, so no modulo bias. Panics if `low >= high`.
    pub fn range_usize(&mut self, low: usize, high: usize) -> usize {
        assert!(low < high, "range_usize: low must be less than high");
        let range = (high - low) as u64;
        if range.is_power_of_two() {
            return low + (self.next_u64() & (range - 1)) as usize;
        }
        let threshold = range.wrapping_neg() % range;
        loop {
            let r = self.next_u64();
            if r >= threshold {
                return low + (r % range) as usize;
            }
        }
    }

    /// Pick one element of `items` uniformly. `None` for an empty slice.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        items.get(self.range_usize(0, items.len()))
    }
}

/// SplitMix64, used only to expand a `u64` seed into xoshiro state.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_durations() {
        let choices = [0.5, 1.0, 1.5];
        let mut a = NoteRng::new(42);
        let mut b = NoteRng::new(42);
        for _ in 0..500 {
            assert_eq!(a.choose(&choices), b.choose(&choices));
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = NoteRng::new(42);
        let mut b = NoteRng::new(43);
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn entropy_seeds_differ() {
        let mut a = NoteRng::from_entropy();
        let mut b = NoteRng::from_entropy();
        let a_stream: Vec<u64> = (0..4).map(|_| a.next_u64()).collect();
        let b_stream: Vec<u64> = (0..4).map(|_| b.next_u64()).collect();
        assert_ne!(a_stream, b_stream);
    }

    #[test]
    fn range_usize_within_bounds() {
        let mut rng = NoteRng::new(555);
        for _ in 0..10_000 {
            let v = rng.range_usize(5, 15);
            assert!((5..15).contains(&v), "range_usize out of range: {v}");
        }
    }

    #[test]
    fn choose_reaches_every_element() {
        let items = ['a', 'b', 'c'];
        let mut rng = NoteRng::new(7);
        let mut seen = [false; 3];
        for _ in 0..1_000 {
            let picked = rng.choose(&items).copied();
            let idx = items.iter().position(|&c| Some(c) == picked);
            if let Some(i) = idx {
                seen[i] = true;
            }
        }
        assert_eq!(seen, [true, true, true]);
    }

    #[test]
    fn choose_empty_is_none() {
        let mut rng = NoteRng::new(1);
        let empty: [f64; 0] = [];
        assert!(rng.choose(&empty).is_none());
    }

    #[test]
    fn choose_single_is_that_element() {
        let mut rng = NoteRng::new(9);
        for _ in 0..10 {
            assert_eq!(rng.choose(&[1.5]), Some(&1.5));
        }
    }
}
