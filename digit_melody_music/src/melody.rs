// Digit text to pitch-offset pipelines.
//
// Each function runs one text through the codec and returns a finished,
// folded offset sequence ready for voice.rs:
// - `direct`: every digit is its own offset (0-9), no decoding at all
// - `distributed`: pack, decode against an interval tree, fold octaves
// - `distributed_timed`: the same over an interval/duration tree, keeping
//   each symbol's duration
// - `ranked`: decode against a tree of the text's own characters ranked by
//   frequency, read each decoded digit as a pitch class, fold octaves

use digit_melody_codec::{
    CodeTree, CodecError, TimedInterval, build_occurrence_tree, decode, fold_octaves, fold_timed,
    pack_digits, parse_digits,
};

/// Digits of `text` used directly as offsets.
pub fn direct(text: &str) -> Result<Vec<i32>, CodecError> {
    Ok(parse_digits(text)?.into_iter().map(digit_offset).collect())
}

/// Folded offsets decoded from `text` against an interval tree.
pub fn distributed(tree: &CodeTree<i32>, text: &str) -> Result<Vec<i32>, CodecError> {
    let field = pack_digits(text)?;
    Ok(fold_octaves(decode(tree, &field).copied()).collect())
}

/// Folded timed intervals decoded from `text` against a duration tree.
pub fn distributed_timed(
    tree: &CodeTree<TimedInterval>,
    text: &str,
) -> Result<Vec<TimedInterval>, CodecError> {
    let field = pack_digits(text)?;
    Ok(fold_timed(decode(tree, &field).copied()).collect())
}

/// Folded offsets decoded from `text` against its own frequency ranking.
pub fn ranked(text: &str) -> Result<Vec<i32>, CodecError> {
    let field = pack_digits(text)?;
    let tree = build_occurrence_tree(text)?;
    // pack_digits has already rejected non-digits, so every symbol parses.
    let classes = decode(&tree, &field)
        .filter_map(|c| c.to_digit(10))
        .map(digit_offset);
    Ok(fold_octaves(classes).collect())
}

fn digit_offset(digit: u32) -> i32 {
    // Digits are 0-9.
    digit as i32
}
