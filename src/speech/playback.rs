//! Blocking audio playback through rodio

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rodio::{Decoder, OutputStream, Sink};

use super::error::SpeechError;

/// Plays an encoded audio file to completion
pub trait Player: Send {
    fn play_file(&self, path: &Path) -> Result<(), SpeechError>;
}

/// Player that opens the default output device for each file
#[derive(Debug, Default, Clone, Copy)]
pub struct RodioPlayer;

impl Player for RodioPlayer {
    fn play_file(&self, path: &Path) -> Result<(), SpeechError> {
        let (_stream, handle) =
            OutputStream::try_default().map_err(|e| SpeechError::Playback(e.to_string()))?;
        let sink = Sink::try_new(&handle).map_err(|e| SpeechError::Playback(e.to_string()))?;

        let file = File::open(path)?;
        let source = Decoder::new(BufReader::new(file))
            .map_err(|e| SpeechError::Playback(format!("decode failed: {e}")))?;

        sink.append(source);
        sink.sleep_until_end();
        Ok(())
    }
}
