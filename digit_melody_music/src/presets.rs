// Built-in scales and digit texts.
//
// A scale is the interval alphabet the code tree is built over. Order
// matters: earlier intervals get shorter codewords and so come up more
// often in decoded melodies. The major ordering starts on the tonic and
// walks the circle of fifths (C G E A F D B), which keeps the most common
// notes consonant.
//
// Digit texts are literal expansions of a few constants. Separators inside
// them (line breaks, the decimal point) are stripped by the codec.

use clap::ValueEnum;

/// Interval alphabets, in codeword order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scale {
    /// Major scale: 1 5 3 6 4 2 7.
    Major,
    /// Natural minor: 1 5 b3 2 4 b6 b7.
    Minor,
    /// Hirajoshi pentatonic (Sachs and Slonimsky spelling).
    Hirajoshi,
}

impl Scale {
    pub const ALL: [Scale; 3] = [Scale::Major, Scale::Minor, Scale::Hirajoshi];

    pub fn intervals(self) -> &'static [i32] {
        match self {
            Scale::Major => &[0, 7, 4, 9, 5, 2, 11],
            Scale::Minor => &[0, 7, 3, 2, 5, 8, 10],
            Scale::Hirajoshi => &[0, 10, 1, 6, 5],
        }
    }
}

/// Built-in digit sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DigitText {
    /// Pi, 291 significant digits.
    Pi,
    /// Euler's number, 376 significant digits.
    E,
    /// 1/7, one period.
    OneSeventh,
}

pub const PI: &str = "
    3.14159265358979323846264338327950288419716939937510582097494459230781640
    6286208998628034825342117067982148086513282306647093844609550582231725359
    4081284811174502841027019385211055596446229489549303819644288109756659334
    4612847564823378678316527120190914564856692346034861045432664821339360726
    ";

pub const E: &str = "
2.718281828459045235360287471352662497757247093699959574966967627724076630353
  547594571382178525166427427466391932003059921817413596629043572900334295260
  595630738132328627943490763233829880753195251019011573834187930702154089149
  934884167509244761460668082264800168477411853742345442437107539077744992069
  551702761838606261331384583000752044933826560297606737113200709328709127443
    ";

pub const ONE_SEVENTH: &str = ".142857";

impl DigitText {
    pub fn text(self) -> &'static str {
        match self {
            DigitText::Pi => PI,
            DigitText::E => E,
            DigitText::OneSeventh => ONE_SEVENTH,
        }
    }

    /// Display name used in track names and progress output.
    pub fn label(self) -> &'static str {
        match self {
            DigitText::Pi => "pi",
            DigitText::E => "e",
            DigitText::OneSeventh => "1/7",
        }
    }
}

/// Note name of a pitch class (any integer, taken mod 12).
pub fn pitch_name(pitch_class: i32) -> &'static str {
    match pitch_class.rem_euclid(12) {
        0 => "C", 1 => "C#", 2 => "D", 3 => "Eb",
        4 => "E", 5 => "F", 6 => "F#", 7 => "G",
        8 => "Ab", 9 => "A", 10 => "Bb", 11 => "B",
        _ => "?",
    }
}
