// Digit packing into a single bit-field.
//
// A digit string is folded left to right into one arbitrary-precision
// unsigned integer: for each digit `d`, shift the accumulator left by the
// bit length of `d` (with 0 counting as one bit) and add `d`. Because `d`
// always fits in its own bit length, the shift-and-add is the same as
// appending `d`'s plain binary digits, which is how `BitField` stores it:
// an MSB-first bit vector with the leading zeros of the integer dropped.
//
// The packing is lossy. Digit boundaries cannot be recovered ("102" and
// "22" both pack to `1010`), and digit strings that start with zeros lose
// them entirely. The bit-field is only a deterministic bit source for the
// decoder.

use crate::error::CodecError;
use bitvec::prelude::{BitVec, Msb0};
use std::fmt;

/// MSB-first bit vector used for packed digit strings.
pub type Bits = BitVec<u8, Msb0>;

/// A packed digit string: an unsigned integer as its plain binary digits.
///
/// Invariant: never empty, and the first bit is 1 unless the value is zero,
/// in which case the field is exactly the single bit `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitField {
    bits: Bits,
}

impl BitField {
    /// Bit-field holding `value`.
    pub fn from_u64(value: u64) -> Self {
        let mut bits = Bits::new();
        push_binary(&mut bits, value, u64::BITS - value.leading_zeros());
        BitField::normalized(bits)
    }

    fn normalized(bits: Bits) -> Self {
        let bits = match bits.first_one() {
            Some(0) => bits,
            Some(start) => bits[start..].to_bitvec(),
            None => Bits::repeat(false, 1),
        };
        BitField { bits }
    }

    /// Number of binary digits (at least 1).
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Always false; a zero value is still one bit long.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn is_zero(&self) -> bool {
        self.bits.not_any()
    }

    /// Bits from most to least significant.
    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().by_vals()
    }

    /// Bit at `index`, counting from the most significant.
    pub fn bit(&self, index: usize) -> Option<bool> {
        self.bits.get(index).map(|b| *b)
    }

    /// Value as a `u64`, or `None` if it needs more than 64 bits.
    pub fn to_u64(&self) -> Option<u64> {
        if self.bits.len() > 64 {
            return None;
        }
        Some(self.bits().fold(0u64, |acc, b| (acc << 1) | u64::from(b)))
    }

    /// The binary digits as a `'0'`/`'1'` string, no prefix or padding.
    pub fn to_bit_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for BitField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.bits() {
            f.write_str(if b { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Whether `ch` is dropped before packing: whitespace, periods and commas.
fn is_separator(ch: char) -> bool {
    ch.is_whitespace() || ch == '.' || ch == ','
}

/// `text` with whitespace, periods and commas removed.
pub fn strip_separators(text: &str) -> String {
    text.chars().filter(|&c| !is_separator(c)).collect()
}

/// Number of bits in the plain binary form of `digit`; 0 counts as one bit.
fn bit_length(digit: u32) -> u32 {
    (u32::BITS - digit.leading_zeros()).max(1)
}

/// Append the low `width` bits of `value`, most significant first.
fn push_binary(bits: &mut Bits, value: u64, width: u32) {
    for shift in (0..width).rev() {
        bits.push((value >> shift) & 1 == 1);
    }
}

/// The decimal digits of `text`, in order, separators skipped.
///
/// Any other non-digit fails with [`CodecError::InvalidSymbol`], reporting
/// its char index in `text`. Only ASCII digits are accepted.
pub fn parse_digits(text: &str) -> Result<Vec<u32>, CodecError> {
    text.chars()
        .enumerate()
        .filter(|&(_, c)| !is_separator(c))
        .map(|(position, symbol)| {
            symbol
                .to_digit(10)
                .ok_or(CodecError::InvalidSymbol { symbol, position })
        })
        .collect()
}

/// Pack a decimal digit string into a bit-field.
///
/// Validation follows [`parse_digits`]. Text without digits packs to zero.
pub fn pack_digits(text: &str) -> Result<BitField, CodecError> {
    let mut bits = Bits::new();
    for digit in parse_digits(text)? {
        push_binary(&mut bits, u64::from(digit), bit_length(digit));
    }
    let field = BitField::normalized(bits);
    log::debug!("packed {} bytes of text into {} bits", text.len(), field.len());
    Ok(field)
}
