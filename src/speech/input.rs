//! Speech input: one `listen()` call, one lower-cased transcript

use tracing::{debug, info};

use super::capture::Recorder;
use super::error::SpeechError;
use super::transcribe::Transcriber;

/// Source of transcripts.
///
/// An empty string means no usable speech was heard. Implementations never
/// surface recognition errors to the caller.
pub trait SpeechInput: Send {
    fn listen(&mut self) -> String;
}

/// Microphone capture followed by transcription
pub struct Microphone<R, T> {
    recorder: R,
    transcriber: T,
}

impl<R: Recorder, T: Transcriber> Microphone<R, T> {
    pub fn new(recorder: R, transcriber: T) -> Self {
        Self {
            recorder,
            transcriber,
        }
    }

    fn capture_text(&mut self) -> Result<String, SpeechError> {
        let capture = self.recorder.record_phrase()?;
        self.transcriber.transcribe(&capture)
    }
}

impl<R: Recorder, T: Transcriber> SpeechInput for Microphone<R, T> {
    fn listen(&mut self) -> String {
        info!("listening");

        match self.capture_text() {
            Ok(text) => {
                let transcript = text.trim().to_lowercase();
                debug!(%transcript, "speech recognized");
                transcript
            }
            Err(SpeechError::NoSpeech) => String::new(),
            Err(e) => {
                debug!(error = %e, "speech recognition failed");
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::capture::Capture;

    struct FixedRecorder(Result<usize, ()>);

    impl Recorder for FixedRecorder {
        fn record_phrase(&mut self) -> Result<Capture, SpeechError> {
            match self.0 {
                Ok(len) => Ok(Capture {
                    samples: vec![0.2; len],
                    sample_rate: 16_000,
                }),
                Err(()) => Err(SpeechError::NoSpeech),
            }
        }
    }

    struct FixedTranscriber(Option<&'static str>);

    impl Transcriber for FixedTranscriber {
        fn transcribe(&self, _capture: &Capture) -> Result<String, SpeechError> {
            self.0
                .map(str::to_string)
                .ok_or_else(|| SpeechError::Transcription("service unavailable".to_string()))
        }
    }

    #[test]
    fn test_transcript_is_lowercased_and_trimmed() {
        let mut mic = Microphone::new(
            FixedRecorder(Ok(160)),
            FixedTranscriber(Some("  Edith Open YouTube ")),
        );
        assert_eq!(mic.listen(), "edith open youtube");
    }

    #[test]
    fn test_transcription_failure_is_empty() {
        let mut mic = Microphone::new(FixedRecorder(Ok(160)), FixedTranscriber(None));
        assert_eq!(mic.listen(), "");
    }

    #[test]
    fn test_silence_yields_independent_empty_results() {
        let mut mic = Microphone::new(FixedRecorder(Err(())), FixedTranscriber(Some("edith")));
        assert_eq!(mic.listen(), "");
        assert_eq!(mic.listen(), "");
    }
}
