//! Speech module: microphone in, synthesized voice out
//!
//! Input and output are exposed as two narrow traits, `SpeechInput` and
//! `SpeechOutput`, so the state machine and dispatcher never touch audio
//! devices or HTTP clients directly.

mod capture;
mod error;
mod input;
mod output;
mod playback;
mod synth;
mod transcribe;

pub use capture::CpalRecorder;
pub use error::SpeechError;
pub use input::{Microphone, SpeechInput};
pub use output::{SpeechOutput, Voice};
pub use playback::RodioPlayer;
pub use synth::GoogleTranslateTts;
pub use transcribe::WhisperApiTranscriber;
