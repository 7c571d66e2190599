// Digit Melody Renderer: CLI entry point.
//
// Renders one voice per digit source and writes the result to MIDI.
// With no sources given, `multitrack` mode plays pi and e together; the
// other modes default to pi alone.
//
// Usage:
//   cargo run -p digit_melody_music -- [output.mid] [--mode MODE] [--scale SCALE]
//     [--text pi|e|one-seventh]... [--input FILE]... [--seed N] [--config FILE]
//     [--tempo BPM]

use clap::Parser;
use digit_melody_music::MusicConfig;
use digit_melody_music::error::RenderError;
use digit_melody_music::midi::write_midi;
use digit_melody_music::presets::{DigitText, Scale, pitch_name};
use digit_melody_music::render::{DigitSource, RenderMode, build_score};
use digit_melody_prng::NoteRng;
use std::path::PathBuf;

/// How many opening notes of each track the progress report names.
const PREVIEW_NOTES: usize = 8;

#[derive(Debug, Parser)]
#[command(name = "render", about = "Render digit expansions as MIDI melodies")]
struct Args {
    /// MIDI file to write.
    #[arg(default_value = "output.mid")]
    output: PathBuf,

    #[arg(long, value_enum, default_value_t = RenderMode::Multitrack)]
    mode: RenderMode,

    /// Interval alphabet the code tree is built over.
    #[arg(long, value_enum, default_value_t = Scale::Major)]
    scale: Scale,

    /// Built-in digit text to render (repeatable).
    #[arg(long = "text", value_enum)]
    texts: Vec<DigitText>,

    /// File of digits to render (repeatable).
    #[arg(long = "input")]
    inputs: Vec<PathBuf>,

    /// Seed for random note durations.
    #[arg(long)]
    seed: Option<u64>,

    /// JSON render config; missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override both single- and multi-track tempo.
    #[arg(long)]
    tempo: Option<u16>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), RenderError> {
    let mut config = match &args.config {
        Some(path) => MusicConfig::load(path)?,
        None => MusicConfig::default(),
    };
    if let Some(tempo) = args.tempo {
        config.tempo_bpm = tempo;
        config.multitrack_tempo_bpm = tempo;
    }
    let sources = collect_sources(args)?;

    println!("=== Digit Melody Renderer ===");
    println!("Output: {}", args.output.display());
    println!("Mode: {:?}", args.mode);
    println!("Scale: {:?} {:?}", args.scale, args.scale.intervals());
    if let Some(s) = args.seed {
        println!("Seed: {s}");
    }
    println!();

    let mut rng = match args.seed {
        Some(s) => NoteRng::new(s),
        None => NoteRng::from_entropy(),
    };

    println!("[1/2] Rendering {} voice(s)...", sources.len());
    let score = build_score(args.mode, args.scale, &sources, &config, &mut rng)?;
    for track in &score.tracks {
        let preview: Vec<&str> = track
            .voice
            .offsets()
            .take(PREVIEW_NOTES)
            .map(|offset| pitch_name(i32::from(track.base_pitch) + offset))
            .collect();
        println!(
            "  {}: {} notes, opens {}",
            track.name,
            track.voice.len(),
            preview.join(" ")
        );
    }

    println!("[2/2] Writing MIDI...");
    write_midi(&score, &args.output)?;

    let seconds = score.duration_beats() * 60.0 / f64::from(score.tempo_bpm);
    println!();
    println!(
        "Done! {} notes, {:.0} beats (~{:.0}s at {} BPM)",
        score.note_count(),
        score.duration_beats(),
        seconds,
        score.tempo_bpm
    );
    Ok(())
}

/// Built-in texts first, then files, in command-line order.
fn collect_sources(args: &Args) -> Result<Vec<DigitSource>, RenderError> {
    let mut sources: Vec<DigitSource> = args
        .texts
        .iter()
        .map(|t| DigitSource::new(t.label(), t.text()))
        .collect();
    for path in &args.inputs {
        let text = std::fs::read_to_string(path)?;
        let label = path
            .file_stem()
            .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned());
        sources.push(DigitSource::new(label, text));
    }
    if sources.is_empty() {
        let defaults: &[DigitText] = match args.mode {
            RenderMode::Multitrack => &[DigitText::Pi, DigitText::E],
            _ => &[DigitText::Pi],
        };
        sources.extend(defaults.iter().map(|t| DigitSource::new(t.label(), t.text())));
    }
    Ok(sources)
}
