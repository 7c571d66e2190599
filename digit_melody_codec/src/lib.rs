// Digit Melody codec.
//
// Turns a digit string into a deterministic pitch sequence. A small ordered
// alphabet (scale intervals, interval/duration pairs, or characters ranked
// by frequency) is given integer codewords by a fixed incremental rule. The
// digit string is packed into one big bit-field, and that bit-field is read
// back one bit at a time, emitting a symbol whenever the value of the bits
// accumulated so far equals a codeword. Decoded pitch classes are finally
// folded into the octave nearest the previous note.
//
// Architecture:
// - tree.rs: `CodeTree` and the codeword assignment rule (`build_tree`)
// - alphabet.rs: alphabet generators (interval/duration product, character
//   frequency ranking) and their tree-building entry points
// - bits.rs: `BitField` and the digit packing rule (`pack_digits`)
// - decode.rs: `Decoder`, the lazy greedy prefix matcher
// - fold.rs: `OctaveFolder`, nearest-octave folding of pitch classes
// - error.rs: `CodecError`
//
// Nothing here does I/O or holds global state. Rendering the resulting
// pitches lives in `digit_melody_music`.

pub mod alphabet;
pub mod bits;
pub mod decode;
pub mod error;
pub mod fold;
pub mod tree;

pub use alphabet::{DEFAULT_DURATIONS, TimedInterval, build_duration_tree, build_occurrence_tree};
pub use bits::{BitField, pack_digits, parse_digits, strip_separators};
pub use decode::{Decoder, decode};
pub use error::CodecError;
pub use fold::{FoldOctaves, OctaveFolder, fold_octaves, fold_timed};
pub use tree::{CodeTree, MAX_ALPHABET_LEN, build_tree};
