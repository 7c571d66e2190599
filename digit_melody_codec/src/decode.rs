// Greedy prefix matching of a bit-field against a code tree.
//
// The decoder walks the bit-field from its most significant bit, appending
// each bit to an accumulator. After every bit it takes the integer value of
// the accumulator and, if that value is a codeword, emits the symbol and
// clears the accumulator. Leading zeros in the accumulator carry no weight,
// so "0", "00" and "000" all look up codeword 0. Bits left in the
// accumulator when the field runs out are dropped without error.
//
// The accumulator is kept as its integer value. A nonzero value only grows
// as bits are appended, so once it passes the tree's largest codeword the
// rest of the field can be consumed without lookups; the result is the same
// as looking up every prefix. Trees from `build_tree` with two or more
// symbols always match a nonzero run within `n - 1` bits, so in practice
// this only triggers for one-symbol trees, where a leading 1 bit can never
// reach codeword 0.
//
// `Decoder` is a plain pull iterator. Stopping early leaves nothing to clean
// up, and the tree and bit-field are only borrowed, so any number of
// decoders can read the same pair.

use crate::bits::BitField;
use crate::tree::CodeTree;
use std::iter::FusedIterator;

/// Lazy sequence of symbols matched in a bit-field.
#[derive(Debug, Clone)]
pub struct Decoder<'a, S> {
    tree: &'a CodeTree<S>,
    field: &'a BitField,
    /// Index of the next bit to read.
    position: usize,
    /// Integer value of the unmatched bits.
    accumulator: u64,
    /// Number of unmatched bits, including leading zeros.
    pending: usize,
    /// Accumulator passed every codeword; nothing can match until the end.
    exhausted: bool,
    finished: bool,
}

impl<'a, S> Decoder<'a, S> {
    pub fn new(tree: &'a CodeTree<S>, field: &'a BitField) -> Self {
        Decoder {
            tree,
            field,
            position: 0,
            accumulator: 0,
            pending: 0,
            exhausted: tree.is_empty(),
            finished: false,
        }
    }

    /// Bits read so far.
    pub fn bits_consumed(&self) -> usize {
        self.position
    }

    /// Trailing bits that never completed a codeword. `None` until the
    /// decoder has run to the end of the field.
    pub fn discarded_bits(&self) -> Option<usize> {
        self.finished.then_some(self.pending)
    }

    fn push_bit(&mut self, bit: bool) {
        self.pending += 1;
        if self.exhausted {
            return;
        }
        let next = self
            .accumulator
            .checked_mul(2)
            .map(|v| v | u64::from(bit))
            .filter(|&v| self.tree.max_codeword().is_some_and(|max| v <= max));
        match next {
            Some(v) => self.accumulator = v,
            None => self.exhausted = true,
        }
    }

    fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        if self.pending > 0 {
            log::debug!(
                "decoder dropped {} trailing bits of {}",
                self.pending,
                self.field.len()
            );
        }
    }
}

impl<'a, S> Iterator for Decoder<'a, S> {
    type Item = &'a S;

    fn next(&mut self) -> Option<&'a S> {
        loop {
            let Some(bit) = self.field.bit(self.position) else {
                self.finish();
                return None;
            };
            self.position += 1;
            self.push_bit(bit);
            if self.exhausted {
                continue;
            }
            if let Some(symbol) = self.tree.get(self.accumulator) {
                log::trace!(
                    "matched codeword {} after {} bits",
                    self.accumulator,
                    self.pending
                );
                self.accumulator = 0;
                self.pending = 0;
                return Some(symbol);
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // At most one symbol per remaining bit.
        (0, Some(self.field.len() - self.position))
    }
}

impl<S> FusedIterator for Decoder<'_, S> {}

/// Decode `field` against `tree`. Shorthand for [`Decoder::new`].
pub fn decode<'a, S>(tree: &'a CodeTree<S>, field: &'a BitField) -> Decoder<'a, S> {
    Decoder::new(tree, field)
}
