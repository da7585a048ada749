//! Speech output: synthesize, play, then discard the audio artifact

use std::io::Write;

use tracing::debug;

use super::error::SpeechError;
use super::playback::Player;
use super::synth::Synthesizer;

/// Sink for spoken responses.
///
/// `speak` blocks until playback has finished. Errors are returned to the
/// caller unchanged.
pub trait SpeechOutput: Send {
    fn speak(&mut self, text: &str) -> Result<(), SpeechError>;
}

/// Synthesizer and player joined through a temporary audio file
pub struct Voice<S, P> {
    synthesizer: S,
    player: P,
}

impl<S: Synthesizer, P: Player> Voice<S, P> {
    pub fn new(synthesizer: S, player: P) -> Self {
        Self {
            synthesizer,
            player,
        }
    }
}

impl<S: Synthesizer, P: Player> SpeechOutput for Voice<S, P> {
    fn speak(&mut self, text: &str) -> Result<(), SpeechError> {
        debug!(%text, "speaking");
        let audio = self.synthesizer.synthesize(text)?;

        // Removed on drop, whether or not playback succeeds
        let mut artifact = tempfile::Builder::new()
            .prefix("response")
            .suffix(".mp3")
            .tempfile()?;
        artifact.write_all(&audio)?;
        artifact.flush()?;

        let played = self.player.play_file(artifact.path());
        artifact.close()?;
        played
    }
}
