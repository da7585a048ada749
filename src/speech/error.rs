//! Errors raised by the audio and speech services

use thiserror::Error;

/// Errors that can occur while capturing, transcribing, synthesizing or
/// playing speech
#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("audio device error: {0}")]
    AudioDevice(String),

    #[error("audio stream error: {0}")]
    AudioStream(String),

    #[error("no speech detected")]
    NoSpeech,

    #[error("transcription error: {0}")]
    Transcription(String),

    #[error("synthesis error: {0}")]
    Synthesis(String),

    #[error("playback error: {0}")]
    Playback(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<cpal::DefaultStreamConfigError> for SpeechError {
    fn from(err: cpal::DefaultStreamConfigError) -> Self {
        SpeechError::AudioDevice(err.to_string())
    }
}

impl From<cpal::BuildStreamError> for SpeechError {
    fn from(err: cpal::BuildStreamError) -> Self {
        SpeechError::AudioStream(err.to_string())
    }
}

impl From<cpal::PlayStreamError> for SpeechError {
    fn from(err: cpal::PlayStreamError) -> Self {
        SpeechError::AudioStream(err.to_string())
    }
}
