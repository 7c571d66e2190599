// Render configuration.
//
// Every musical constant the renderer uses (tempo, base pitch, durations,
// velocity, instrument) lives in `MusicConfig` rather than in code. The
// built-in values are the `Default` impl; a JSON file can override any
// subset of fields since missing fields fall back to their defaults.
//
// Offsets coming out of the codec are relative to `base_pitch`. In
// multi-voice renders voice `i` is shifted up by `i * track_pitch_spacing`
// so the voices sit in separate registers.

use crate::error::RenderError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MusicConfig {
    /// Tempo for single-voice renders, in quarter notes per minute.
    pub tempo_bpm: u16,
    /// Tempo for multi-voice renders.
    pub multitrack_tempo_bpm: u16,
    /// MIDI key for offset 0. 60 is middle C.
    pub base_pitch: u8,
    /// Semitones added per voice index in multi-voice renders.
    pub track_pitch_spacing: u8,
    /// Note-on velocity.
    pub volume: u8,
    /// Fixed note length in quarter-note beats.
    pub note_duration: f64,
    /// Lengths drawn from when a voice uses random durations.
    pub random_durations: Vec<f64>,
    /// General MIDI program for every voice track (0 = acoustic grand).
    pub program: u8,
    /// Name of the first voice track.
    pub track_name: String,
}

impl Default for MusicConfig {
    fn default() -> Self {
        MusicConfig {
            tempo_bpm: 150,
            multitrack_tempo_bpm: 140,
            base_pitch: 60,
            track_pitch_spacing: 24,
            volume: 100,
            note_duration: 0.5,
            random_durations: vec![0.5, 1.0, 1.5],
            program: 0,
            track_name: "Sample Track".into(),
        }
    }
}

impl MusicConfig {
    /// Parse and validate a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, RenderError> {
        let config: MusicConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, RenderError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), RenderError> {
        let invalid = |msg: String| Err(RenderError::InvalidConfig(msg));
        if self.tempo_bpm == 0 || self.multitrack_tempo_bpm == 0 {
            return invalid("tempo must be positive".into());
        }
        for (name, value) in [
            ("base_pitch", self.base_pitch),
            ("volume", self.volume),
            ("program", self.program),
        ] {
            if value > 127 {
                return invalid(format!("{name} {value} exceeds 127"));
            }
        }
        if !is_positive_duration(self.note_duration) {
            return invalid(format!("note_duration {} must be positive", self.note_duration));
        }
        if self.random_durations.is_empty() {
            return invalid("random_durations must not be empty".into());
        }
        if let Some(d) = self
            .random_durations
            .iter()
            .find(|&&d| !is_positive_duration(d))
        {
            return invalid(format!("random duration {d} must be positive"));
        }
        Ok(())
    }
}

pub(crate) fn is_positive_duration(beats: f64) -> bool {
    beats.is_finite() && beats > 0.0
}
