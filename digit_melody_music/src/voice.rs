// Timeline placement of pitch offsets.
//
// A `Voice` is one melodic line: a list of notes laid end to end. A running
// time cursor starts at beat 0; each note starts at the cursor, and the
// cursor then advances by that note's duration, so notes never overlap or
// leave gaps. Durations come from a `DurationPolicy` (one fixed length, or a
// random pick per note from a small set) or, for interval/duration
// alphabets, from the decoded symbols themselves.
//
// Times are in quarter-note beats. Offsets are still relative; midi.rs adds
// the track's base pitch.

use crate::config::is_positive_duration;
use crate::error::RenderError;
use digit_melody_codec::TimedInterval;
use digit_melody_prng::NoteRng;

/// One note of a voice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    /// Semitones relative to the track's base pitch.
    pub offset: i32,
    /// Start time in beats.
    pub start: f64,
    /// Length in beats.
    pub duration: f64,
}

impl Note {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// How note lengths are chosen when the melody itself carries none.
#[derive(Debug, Clone, PartialEq)]
pub enum DurationPolicy {
    /// Every note the same length.
    Fixed(f64),
    /// Each note draws uniformly from the set.
    Random(Vec<f64>),
}

impl DurationPolicy {
    fn check(&self) -> Result<(), RenderError> {
        let durations: &[f64] = match self {
            DurationPolicy::Fixed(d) => std::slice::from_ref(d),
            DurationPolicy::Random(choices) => choices,
        };
        if durations.is_empty() {
            return Err(RenderError::InvalidConfig(
                "no durations to choose from".into(),
            ));
        }
        match durations.iter().find(|&&d| !is_positive_duration(d)) {
            Some(d) => Err(RenderError::InvalidConfig(format!(
                "duration {d} must be positive"
            ))),
            None => Ok(()),
        }
    }

    fn next_duration(&self, rng: &mut NoteRng) -> Option<f64> {
        match self {
            DurationPolicy::Fixed(d) => Some(*d),
            DurationPolicy::Random(choices) => rng.choose(choices).copied(),
        }
    }
}

/// A single melodic line on a shared timeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Voice {
    pub notes: Vec<Note>,
}

impl Voice {
    /// Place `offsets` back to back with lengths from `policy`.
    ///
    /// `rng` is only drawn from for `DurationPolicy::Random`.
    pub fn from_offsets(
        offsets: impl IntoIterator<Item = i32>,
        policy: &DurationPolicy,
        rng: &mut NoteRng,
    ) -> Result<Self, RenderError> {
        policy.check()?;
        let mut voice = Voice::default();
        for offset in offsets {
            let Some(duration) = policy.next_duration(rng) else {
                break;
            };
            voice.push(offset, duration);
        }
        Ok(voice)
    }

    /// Place timed intervals back to back, each with its own length.
    pub fn from_timed(timed: impl IntoIterator<Item = TimedInterval>) -> Result<Self, RenderError> {
        let mut voice = Voice::default();
        for t in timed {
            if !is_positive_duration(t.duration) {
                return Err(RenderError::InvalidConfig(format!(
                    "duration {} must be positive",
                    t.duration
                )));
            }
            voice.push(t.interval, t.duration);
        }
        Ok(voice)
    }

    fn push(&mut self, offset: i32, duration: f64) {
        let start = self.end_time();
        self.notes.push(Note {
            offset,
            start,
            duration,
        });
    }

    /// Time the last note ends, 0 for an empty voice.
    pub fn end_time(&self) -> f64 {
        self.notes.last().map_or(0.0, Note::end)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn offsets(&self) -> impl Iterator<Item = i32> + '_ {
        self.notes.iter().map(|n| n.offset)
    }
}
