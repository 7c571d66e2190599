// End-to-end renders: digit text in, MIDI file on disk, parsed back with midly.

use digit_melody_music::MusicConfig;
use digit_melody_music::midi::write_midi;
use digit_melody_music::presets::{DigitText, Scale};
use digit_melody_music::render::{DigitSource, RenderMode, build_score};
use digit_melody_prng::NoteRng;
use midly::{MetaMessage, MidiMessage, Smf, TrackEventKind};
use proptest::prelude::*;
use std::path::Path;

fn render_to_file(
    mode: RenderMode,
    sources: &[DigitSource],
    seed: u64,
    path: &Path,
) -> Result<(), digit_melody_music::RenderError> {
    let config = MusicConfig::default();
    let score = build_score(mode, Scale::Major, sources, &config, &mut NoteRng::new(seed))?;
    write_midi(&score, path)
}

/// (channel, key) of every note-on in a track.
fn note_ons(smf: &Smf<'_>, track: usize) -> Vec<(u8, u8)> {
    smf.tracks[track]
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

fn tempo(smf: &Smf<'_>) -> Option<u32> {
    smf.tracks[0].iter().find_map(|e| match e.kind {
        TrackEventKind::Meta(MetaMessage::Tempo(t)) => Some(t.as_int()),
        _ => None,
    })
}

#[test]
fn distributed_pi_prefix_writes_expected_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pi.mid");
    render_to_file(
        RenderMode::Distributed,
        &[DigitSource::new("pi", "3.14")],
        0,
        &path,
    )
    .unwrap();

    let bytes = std::fs::read(&path).unwrap();
    let smf = Smf::parse(&bytes).unwrap();
    assert_eq!(smf.tracks.len(), 2);
    assert_eq!(tempo(&smf), Some(400_000));
    // "314" packs to "111100", which decodes to offsets 5 and 0.
    assert_eq!(note_ons(&smf, 1), vec![(0, 65), (0, 60)]);
}

#[test]
fn default_multitrack_render_of_pi_and_e() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.mid");
    let sources: Vec<DigitSource> = [DigitText::Pi, DigitText::E]
        .into_iter()
        .map(|t| DigitSource::new(t.label(), t.text()))
        .collect();
    render_to_file(RenderMode::Multitrack, &sources, 7, &path).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    let smf = Smf::parse(&bytes).unwrap();
    assert_eq!(smf.tracks.len(), 3);
    assert_eq!(tempo(&smf), Some(60_000_000 / 140));

    let pi = note_ons(&smf, 1);
    let e = note_ons(&smf, 2);
    assert!(!pi.is_empty());
    assert!(!e.is_empty());
    assert!(pi.iter().all(|&(channel, _)| channel == 0));
    assert!(e.iter().all(|&(channel, _)| channel == 1));
}

#[test]
fn same_seed_same_file() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.mid");
    let b = dir.path().join("b.mid");
    let sources = [DigitSource::new("e", DigitText::E.text())];
    render_to_file(RenderMode::Multitrack, &sources, 42, &a).unwrap();
    render_to_file(RenderMode::Multitrack, &sources, 42, &b).unwrap();
    assert_eq!(std::fs::read(&a).unwrap(), std::fs::read(&b).unwrap());
}

#[test]
fn invalid_digits_write_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.mid");
    let result = render_to_file(
        RenderMode::Timed,
        &[DigitSource::new("bad", "3.14x")],
        0,
        &path,
    );
    assert!(result.is_err());
    assert!(!path.exists());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn direct_render_plays_every_digit(text in "[0-9]{1,64}") {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("direct.mid");
        render_to_file(RenderMode::Direct, &[DigitSource::new("d", text.clone())], 0, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let smf = Smf::parse(&bytes).unwrap();
        let keys: Vec<u8> = note_ons(&smf, 1).into_iter().map(|(_, key)| key).collect();
        let expected: Vec<u8> = text.bytes().map(|b| 60 + (b - b'0')).collect();
        prop_assert_eq!(keys, expected);
    }
}
