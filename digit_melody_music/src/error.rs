// Errors from configuration loading, melody building and MIDI output.

use digit_melody_codec::CodecError;
use std::io;

/// Anything that can stop a render.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A note landed outside MIDI's 0..=127 key range.
    #[error("pitch {pitch} on track {track} is outside the MIDI range 0-127")]
    PitchOutOfRange { pitch: i32, track: usize },

    /// More voices than there are usable MIDI channels.
    #[error("{count} voices requested, at most {max} fit in separate MIDI channels")]
    TooManyTracks { count: usize, max: usize },
}
