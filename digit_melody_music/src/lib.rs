// Digit Melody Renderer
//
// Turns digit strings (expansions of pi, e, 1/7, or any file of digits) into
// melodies and writes them as Standard MIDI Files. The digits are packed
// into one bit string, decoded against a code tree built over a musical
// alphabet, folded into a narrow register and laid out on a timeline.
//
// Architecture:
// - config.rs: Render settings (tempo, pitches, durations), JSON loading
// - presets.rs: Built-in scales and digit texts, pitch names
// - melody.rs: Text-to-offset pipelines (direct, distributed, timed, ranked)
// - voice.rs: Timeline placement of offsets with fixed or random durations
// - render.rs: Render modes, one voice per digit source, score layout
// - midi.rs: Score representation and MIDI file output
// - error.rs: RenderError
//
// The bit-level work (code trees, packing, decoding, octave folding) lives in
// digit_melody_codec. Random durations come from digit_melody_prng and are
// reproducible given a seed.

pub mod config;
pub mod error;
pub mod melody;
pub mod midi;
pub mod presets;
pub mod render;
pub mod voice;

pub use config::MusicConfig;
pub use error::RenderError;
