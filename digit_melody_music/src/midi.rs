// MIDI output from rendered voices.
//
// Converts a `Score` into a Standard MIDI File (SMF) for playback. Track 0
// holds only the tempo; every voice gets its own track and its own channel,
// skipping channel 9 which General MIDI reserves for percussion. Beats map
// to ticks at 480 ticks per quarter note.
//
// Notes become note-on/note-off pairs. Events are sorted by tick with
// note-offs first, so back-to-back notes on the same key re-attack cleanly.
//
// Uses the `midly` crate for MIDI writing. Output is SMF Format 1.

use crate::config::MusicConfig;
use crate::error::RenderError;
use crate::voice::Voice;
use midly::{
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
    num::{u4, u7, u15, u24, u28},
};
use std::path::Path;

/// Ticks per quarter note in MIDI output.
const TICKS_PER_QUARTER: u16 = 480;

/// Voices that fit on distinct melodic channels (16 minus percussion).
pub const MAX_TRACKS: usize = 15;

/// Slowest tempo whose microseconds-per-quarter fits the 24-bit tempo field.
const MIN_TEMPO_BPM: u16 = 4;

/// Largest tick a track event can sit at; deltas are 28-bit.
const MAX_TICK: u32 = (1 << 28) - 1;

/// General MIDI percussion channel, never assigned to a voice.
const PERCUSSION_CHANNEL: usize = 9;

/// One voice with its register and label.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreTrack {
    pub name: String,
    /// MIDI key that offset 0 maps to.
    pub base_pitch: u8,
    pub voice: Voice,
}

/// Everything needed to write one MIDI file.
#[derive(Debug, Clone, PartialEq)]
pub struct Score {
    pub tempo_bpm: u16,
    pub velocity: u8,
    pub program: u8,
    pub tracks: Vec<ScoreTrack>,
}

impl Score {
    /// Empty score with the config's instrument and velocity.
    pub fn new(tempo_bpm: u16, config: &MusicConfig) -> Self {
        Score {
            tempo_bpm,
            velocity: config.volume,
            program: config.program,
            tracks: Vec::new(),
        }
    }

    /// One voice at the base pitch and single-voice tempo.
    pub fn single_voice(voice: Voice, config: &MusicConfig) -> Self {
        let mut score = Score::new(config.tempo_bpm, config);
        score.tracks.push(ScoreTrack {
            name: config.track_name.clone(),
            base_pitch: config.base_pitch,
            voice,
        });
        score
    }

    /// Several named voices, voice `i` raised by `i * track_pitch_spacing`.
    ///
    /// The first track takes the config's track name; the rest keep theirs.
    pub fn multitrack(
        voices: impl IntoIterator<Item = (String, Voice)>,
        config: &MusicConfig,
    ) -> Self {
        let mut score = Score::new(config.multitrack_tempo_bpm, config);
        for (i, (name, voice)) in voices.into_iter().enumerate() {
            let shift = (i as u32).saturating_mul(u32::from(config.track_pitch_spacing));
            let base_pitch = u32::from(config.base_pitch).saturating_add(shift);
            score.tracks.push(ScoreTrack {
                name: if i == 0 { config.track_name.clone() } else { name },
                base_pitch: u8::try_from(base_pitch).unwrap_or(u8::MAX),
                voice,
            });
        }
        score
    }

    pub fn note_count(&self) -> usize {
        self.tracks.iter().map(|t| t.voice.len()).sum()
    }

    /// Length of the longest voice in beats.
    pub fn duration_beats(&self) -> f64 {
        self.tracks
            .iter()
            .map(|t| t.voice.end_time())
            .fold(0.0, f64::max)
    }
}

/// Convert a score to MIDI and write it to a file.
pub fn write_midi(score: &Score, path: &Path) -> Result<(), RenderError> {
    let smf = score_to_smf(score)?;
    smf.save(path)?;
    log::info!(
        "wrote {} notes on {} tracks to {}",
        score.note_count(),
        score.tracks.len(),
        path.display()
    );
    Ok(())
}

/// Convert a score to an in-memory SMF borrowing its track names.
pub fn score_to_smf(score: &Score) -> Result<Smf<'_>, RenderError> {
    if score.tempo_bpm < MIN_TEMPO_BPM {
        return Err(RenderError::InvalidConfig(format!(
            "tempo {} is below {MIN_TEMPO_BPM} bpm",
            score.tempo_bpm
        )));
    }
    if score.velocity > 127 || score.program > 127 {
        return Err(RenderError::InvalidConfig(
            "velocity and program must be at most 127".into(),
        ));
    }
    if score.tracks.len() > MAX_TRACKS {
        return Err(RenderError::TooManyTracks {
            count: score.tracks.len(),
            max: MAX_TRACKS,
        });
    }

    let mut smf = Smf::new(Header::new(
        Format::Parallel,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
    ));

    // Track 0: tempo track
    let tempo_microseconds = 60_000_000 / u32::from(score.tempo_bpm);
    smf.tracks.push(vec![
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(tempo_microseconds))),
        },
        end_of_track(),
    ]);

    for (index, score_track) in score.tracks.iter().enumerate() {
        smf.tracks.push(voice_track(score, index, score_track)?);
    }

    Ok(smf)
}

fn voice_track<'a>(
    score: &Score,
    index: usize,
    score_track: &'a ScoreTrack,
) -> Result<Track<'a>, RenderError> {
    let channel = channel_for(index);
    let mut track: Track<'a> = vec![
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::TrackName(score_track.name.as_bytes())),
        },
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::ProgramChange {
                    program: u7::new(score.program),
                },
            },
        },
    ];

    // (tick, is_note_on, key): sorting puts note-offs before note-ons.
    let mut events: Vec<(u32, bool, u8)> = Vec::with_capacity(score_track.voice.len() * 2);
    for note in &score_track.voice.notes {
        let pitch = i32::from(score_track.base_pitch) + note.offset;
        let key = u8::try_from(pitch)
            .ok()
            .filter(|&k| k <= 127)
            .ok_or(RenderError::PitchOutOfRange {
                pitch,
                track: index,
            })?;
        let too_long = || {
            RenderError::InvalidConfig(format!(
                "note ending at beat {} on track {index} is past the last MIDI tick",
                note.end()
            ))
        };
        events.push((beats_to_ticks(note.start).ok_or_else(too_long)?, true, key));
        events.push((beats_to_ticks(note.end()).ok_or_else(too_long)?, false, key));
    }
    events.sort_by_key(|&(tick, on, _)| (tick, on));

    let mut last_tick = 0;
    for (tick, on, key) in events {
        let message = if on {
            MidiMessage::NoteOn {
                key: u7::new(key),
                vel: u7::new(score.velocity),
            }
        } else {
            MidiMessage::NoteOff {
                key: u7::new(key),
                vel: u7::new(0),
            }
        };
        track.push(TrackEvent {
            delta: u28::new(tick - last_tick),
            kind: TrackEventKind::Midi { channel, message },
        });
        last_tick = tick;
    }

    track.push(end_of_track());
    Ok(track)
}

fn end_of_track() -> TrackEvent<'static> {
    TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    }
}

/// Channel for the voice at `index`, stepping over percussion.
fn channel_for(index: usize) -> u4 {
    let channel = if index >= PERCUSSION_CHANNEL { index + 1 } else { index };
    u4::new(channel as u8)
}

/// `None` when the tick does not fit a 28-bit delta from the track start.
fn beats_to_ticks(beats: f64) -> Option<u32> {
    let ticks = (beats * f64::from(TICKS_PER_QUARTER)).round();
    if ticks.is_finite() && (0.0..=f64::from(MAX_TICK)).contains(&ticks) {
        Some(ticks as u32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voice::DurationPolicy;
    use digit_melody_prng::NoteRng;

    fn voice(offsets: &[i32]) -> Voice {
        Voice::from_offsets(
            offsets.iter().copied(),
            &DurationPolicy::Fixed(0.5),
            &mut NoteRng::new(0),
        )
        .unwrap()
    }

    fn note_ons(track: &Track<'_>) -> Vec<(u8, u8)> {
        track
            .iter()
            .filter_map(|e| match e.kind {
                TrackEventKind::Midi {
                    channel,
                    message: MidiMessage::NoteOn { key, .. },
                } => Some((channel.as_int(), key.as_int())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_single_voice_layout() {
        let config = MusicConfig::default();
        let score = Score::single_voice(voice(&[-5, 0, -5, 0]), &config);
        let smf = score_to_smf(&score).unwrap();
        // 1 tempo track + 1 voice track
        assert_eq!(smf.tracks.len(), 2);
        assert_eq!(note_ons(&smf.tracks[1]), vec![(0, 55), (0, 60), (0, 55), (0, 60)]);
    }

    #[test]
    fn test_tempo_event() {
        let config = MusicConfig::default();
        let score = Score::single_voice(voice(&[0]), &config);
        let smf = score_to_smf(&score).unwrap();
        assert!(matches!(
            smf.tracks[0][0].kind,
            TrackEventKind::Meta(MetaMessage::Tempo(t)) if t.as_int() == 400_000
        ));
    }

    #[test]
    fn test_note_deltas() {
        let config = MusicConfig::default();
        let score = Score::single_voice(voice(&[0, 2]), &config);
        let smf = score_to_smf(&score).unwrap();
        let deltas: Vec<u32> = smf.tracks[1]
            .iter()
            .filter(|e| matches!(e.kind, TrackEventKind::Midi { message: MidiMessage::NoteOn { .. } | MidiMessage::NoteOff { .. }, .. }))
            .map(|e| e.delta.as_int())
            .collect();
        // on 0, off 240 (before next on at the same tick), on 0, off 240
        assert_eq!(deltas, vec![0, 240, 0, 240]);
    }

    #[test]
    fn test_repeated_key_releases_before_reattack() {
        let config = MusicConfig::default();
        let score = Score::single_voice(voice(&[0, 0]), &config);
        let smf = score_to_smf(&score).unwrap();
        let kinds: Vec<bool> = smf.tracks[1]
            .iter()
            .filter_map(|e| match e.kind {
                TrackEventKind::Midi { message: MidiMessage::NoteOn { .. }, .. } => Some(true),
                TrackEventKind::Midi { message: MidiMessage::NoteOff { .. }, .. } => Some(false),
                _ => None,
            })
            .collect();
        assert_eq!(kinds, vec![true, false, true, false]);
    }

    #[test]
    fn test_multitrack_registers_and_channels() {
        let config = MusicConfig::default();
        let score = Score::multitrack(
            vec![("pi".to_string(), voice(&[0])), ("e".to_string(), voice(&[0]))],
            &config,
        );
        assert_eq!(score.tempo_bpm, 140);
        assert_eq!(score.tracks[0].name, "Sample Track");
        assert_eq!(score.tracks[1].name, "e");
        let smf = score_to_smf(&score).unwrap();
        assert_eq!(smf.tracks.len(), 3);
        assert_eq!(note_ons(&smf.tracks[1]), vec![(0, 60)]);
        assert_eq!(note_ons(&smf.tracks[2]), vec![(1, 84)]);
    }

    #[test]
    fn test_tempo_too_slow_for_midi() {
        let mut score = Score::single_voice(voice(&[0]), &MusicConfig::default());
        score.tempo_bpm = 3;
        assert!(matches!(score_to_smf(&score), Err(RenderError::InvalidConfig(_))));
    }

    #[test]
    fn test_percussion_channel_skipped() {
        assert_eq!(channel_for(8).as_int(), 8);
        assert_eq!(channel_for(9).as_int(), 10);
        assert_eq!(channel_for(14).as_int(), 15);
    }

    #[test]
    fn test_pitch_out_of_range() {
        let config = MusicConfig::default();
        let voices = (0..4).map(|i| (format!("v{i}"), voice(&[7])));
        let score = Score::multitrack(voices, &config);
        // Track 3 sits at 60 + 72 = 132.
        let err = score_to_smf(&score).unwrap_err();
        assert!(matches!(err, RenderError::PitchOutOfRange { pitch: 139, track: 3 }));
    }

    #[test]
    fn test_negative_pitch_out_of_range() {
        let config = MusicConfig {
            base_pitch: 2,
            ..MusicConfig::default()
        };
        let score = Score::single_voice(voice(&[-5]), &config);
        assert!(matches!(
            score_to_smf(&score),
            Err(RenderError::PitchOutOfRange { pitch: -3, track: 0 })
        ));
    }

    #[test]
    fn test_too_many_tracks() {
        let config = MusicConfig {
            track_pitch_spacing: 0,
            ..MusicConfig::default()
        };
        let voices = (0..16).map(|i| (format!("v{i}"), voice(&[0])));
        let score = Score::multitrack(voices, &config);
        assert!(matches!(
            score_to_smf(&score),
            Err(RenderError::TooManyTracks { count: 16, max: 15 })
        ));
    }

    #[test]
    fn test_score_summary() {
        let config = MusicConfig::default();
        let score = Score::multitrack(
            vec![("a".to_string(), voice(&[0, 1, 2])), ("b".to_string(), voice(&[0]))],
            &config,
        );
        assert_eq!(score.note_count(), 4);
        assert_eq!(score.duration_beats(), 1.5);
    }

    #[test]
    fn test_beats_to_ticks() {
        assert_eq!(beats_to_ticks(0.0), Some(0));
        assert_eq!(beats_to_ticks(0.5), Some(240));
        assert_eq!(beats_to_ticks(1.5), Some(720));
        assert_eq!(beats_to_ticks(f64::from(MAX_TICK) / 480.0), Some(MAX_TICK));
        assert_eq!(beats_to_ticks(f64::from(MAX_TICK + 1) / 480.0), None);
        assert_eq!(beats_to_ticks(f64::INFINITY), None);
    }

    fn long_note_score(duration: f64) -> Score {
        let config = MusicConfig {
            note_duration: duration,
            ..MusicConfig::default()
        };
        let voice = Voice::from_offsets(
            [0],
            &DurationPolicy::Fixed(config.note_duration),
            &mut NoteRng::new(0),
        )
        .unwrap();
        Score::single_voice(voice, &config)
    }

    #[test]
    fn test_note_past_last_tick_rejected() {
        // 600000 beats is 288000000 ticks, more than a 28-bit delta holds.
        let score = long_note_score(600_000.0);
        assert!(matches!(score_to_smf(&score), Err(RenderError::InvalidConfig(_))));
    }

    #[test]
    fn test_long_note_keeps_its_length() {
        // 500000 beats is 240000000 ticks, still within 28 bits.
        let score = long_note_score(500_000.0);
        let smf = score_to_smf(&score).unwrap();
        let total: u32 = smf.tracks[1].iter().map(|e| e.delta.as_int()).sum();
        assert_eq!(total, 240_000_000);
    }
}
