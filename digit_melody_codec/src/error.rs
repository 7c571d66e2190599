// Errors raised while building code trees and packing digit strings.
//
// Decoding and folding never fail, so only the two build steps report
// errors. A failed call leaves previously built trees and bit-fields intact.

/// Validation failure in tree building or digit packing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// A character other than a decimal digit survived separator stripping.
    #[error("invalid symbol {symbol:?} at position {position}: expected a decimal digit")]
    InvalidSymbol { symbol: char, position: usize },

    /// A code tree needs at least one symbol.
    #[error("cannot build a code tree from an empty alphabet")]
    EmptyAlphabet,

    /// The alphabet is too long for its codewords to fit in a `u64`.
    #[error("alphabet has {len} symbols, at most {max} are supported")]
    AlphabetTooLarge { len: usize, max: usize },
}
