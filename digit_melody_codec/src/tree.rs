// Code trees: codeword assignment over an ordered alphabet.
//
// A `CodeTree` maps integer codewords to alphabet symbols. Codewords are
// handed out by a running cursor: each symbol takes the cursor as its key,
// then the cursor advances to `(cursor + 1) << 1`. The last symbol instead
// takes `cursor >> 1`, which is what lets the final entry end on an odd key.
// For the major-scale alphabet `(0, 7, 4, 9, 5, 2, 11)` this gives
//
//     {0: 0, 2: 7, 6: 4, 14: 9, 30: 5, 62: 2, 63: 11}
//
// The decoder (decode.rs) looks codewords up by the integer value of the
// accumulated bits, so leading zeros never distinguish keys. That is not a
// textbook prefix code and is not meant to be one.
//
// Keys are always pairwise distinct: the non-final keys are `2^(i+1) - 2`,
// strictly increasing and even, and the final key is either 0 (one-symbol
// alphabet) or `2^(n-1) - 1`, the only odd key.

use crate::error::CodecError;
use serde::Serialize;
use std::collections::BTreeMap;

/// Longest alphabet whose codewords fit in a `u64`.
pub const MAX_ALPHABET_LEN: usize = 64;

/// Mapping from codeword to symbol, built once per alphabet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CodeTree<S> {
    entries: BTreeMap<u64, S>,
}

impl<S> CodeTree<S> {
    /// A tree with no codewords. `build_tree` never returns one; decoding
    /// against it yields nothing.
    pub fn empty() -> Self {
        CodeTree {
            entries: BTreeMap::new(),
        }
    }

    /// Symbol stored under `codeword`, if any.
    pub fn get(&self, codeword: u64) -> Option<&S> {
        self.entries.get(&codeword)
    }

    pub fn contains(&self, codeword: u64) -> bool {
        self.entries.contains_key(&codeword)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Largest codeword in the tree. Once the decoder's accumulator passes
    /// this value it can never match again.
    pub fn max_codeword(&self) -> Option<u64> {
        self.entries.keys().next_back().copied()
    }

    /// `(codeword, symbol)` pairs in ascending codeword order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &S)> + '_ {
        self.entries.iter().map(|(&k, v)| (k, v))
    }

    /// Symbols in ascending codeword order, which is also alphabet order.
    pub fn symbols(&self) -> impl Iterator<Item = &S> + '_ {
        self.entries.values()
    }
}

/// Assign a codeword to every symbol of `alphabet`, in order.
///
/// Fails on an empty alphabet or one longer than [`MAX_ALPHABET_LEN`]. A
/// single-symbol alphabet is accepted with a warning: its only codeword is 0,
/// so the decoder will never match a run of `1` bits against it.
pub fn build_tree<S>(alphabet: impl IntoIterator<Item = S>) -> Result<CodeTree<S>, CodecError> {
    let symbols: Vec<S> = alphabet.into_iter().collect();
    let len = symbols.len();
    if len == 0 {
        return Err(CodecError::EmptyAlphabet);
    }
    if len > MAX_ALPHABET_LEN {
        return Err(CodecError::AlphabetTooLarge {
            len,
            max: MAX_ALPHABET_LEN,
        });
    }
    if len == 1 {
        log::warn!(
            "degenerate alphabet: one symbol gets codeword 0 and runs of 1 bits will never match"
        );
    }

    let final_index = len - 1;
    let mut entries = BTreeMap::new();
    let mut last: u64 = 0;
    for (i, symbol) in symbols.into_iter().enumerate() {
        let key = if i == final_index { last >> 1 } else { last };
        entries.insert(key, symbol);
        // Skipping the advance after the final symbol keeps a 64-symbol
        // alphabet inside u64.
        if i < final_index {
            last = (last + 1) << 1;
        }
    }

    log::debug!("built code tree with {} codewords", entries.len());
    Ok(CodeTree { entries })
}
