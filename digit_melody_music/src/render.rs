// From digit texts to a finished score.
//
// A render takes one or more digit sources and turns each into a voice with
// the same pipeline, chosen by `RenderMode`. One voice becomes a
// single-track score at the base pitch; several voices (or any `Multitrack`
// render) are stacked in registers `track_pitch_spacing` apart.

use crate::config::MusicConfig;
use crate::error::RenderError;
use crate::melody;
use crate::midi::Score;
use crate::presets::Scale;
use crate::voice::{DurationPolicy, Voice};
use clap::ValueEnum;
use digit_melody_codec::{DEFAULT_DURATIONS, build_duration_tree, build_tree};
use digit_melody_prng::NoteRng;

/// How each digit source becomes a voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RenderMode {
    /// Each digit is a note, 0-9 semitones above the base pitch.
    Direct,
    /// Decode against the scale tree and fold octaves, fixed durations.
    Distributed,
    /// Decode against the scale/duration tree; durations come from the code.
    Timed,
    /// Decode against a tree of the source's own digits, rarest first.
    Ranked,
    /// Like `Distributed`, with random durations, always multi-track.
    Multitrack,
}

/// A named digit text to render as one voice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitSource {
    pub label: String,
    pub text: String,
}

impl DigitSource {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        DigitSource {
            label: label.into(),
            text: text.into(),
        }
    }
}

/// Render every source with `mode` and lay the voices out in a score.
pub fn build_score(
    mode: RenderMode,
    scale: Scale,
    sources: &[DigitSource],
    config: &MusicConfig,
    rng: &mut NoteRng,
) -> Result<Score, RenderError> {
    config.validate()?;
    let voices = sources
        .iter()
        .map(|source| {
            let voice = render_voice(mode, scale, &source.text, config, rng)?;
            log::info!("{}: {} notes", source.label, voice.len());
            Ok((source.label.clone(), voice))
        })
        .collect::<Result<Vec<_>, RenderError>>()?;

    if mode != RenderMode::Multitrack && voices.len() == 1 {
        let (_, voice) = voices.into_iter().next().unwrap_or_default();
        return Ok(Score::single_voice(voice, config));
    }
    Ok(Score::multitrack(voices, config))
}

/// One source through one pipeline.
pub fn render_voice(
    mode: RenderMode,
    scale: Scale,
    text: &str,
    config: &MusicConfig,
    rng: &mut NoteRng,
) -> Result<Voice, RenderError> {
    let fixed = DurationPolicy::Fixed(config.note_duration);
    match mode {
        RenderMode::Direct => Voice::from_offsets(melody::direct(text)?, &fixed, rng),
        RenderMode::Distributed => {
            let tree = build_tree(scale.intervals().iter().copied())?;
            Voice::from_offsets(melody::distributed(&tree, text)?, &fixed, rng)
        }
        RenderMode::Timed => {
            let tree = build_duration_tree(scale.intervals(), &DEFAULT_DURATIONS)?;
            Voice::from_timed(melody::distributed_timed(&tree, text)?)
        }
        RenderMode::Ranked => Voice::from_offsets(melody::ranked(text)?, &fixed, rng),
        RenderMode::Multitrack => {
            let tree = build_tree(scale.intervals().iter().copied())?;
            let random = DurationPolicy::Random(config.random_durations.clone());
            Voice::from_offsets(melody::distributed(&tree, text)?, &random, rng)
        }
    }
}
