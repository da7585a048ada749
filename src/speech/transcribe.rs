//! Speech-to-text over an OpenAI-compatible transcription API

use std::io::Cursor;
use std::time::Duration;

use serde::Deserialize;

use super::capture::Capture;
use super::error::SpeechError;
use crate::config::SttSettings;

/// Turns a captured phrase into text
pub trait Transcriber: Send {
    fn transcribe(&self, capture: &Capture) -> Result<String, SpeechError>;
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Transcriber that uploads WAV audio to `{base_url}/audio/transcriptions`
#[derive(Debug, Clone)]
pub struct WhisperApiTranscriber {
    base_url: String,
    api_key: Option<String>,
    model: String,
    client: reqwest::blocking::Client,
}

impl WhisperApiTranscriber {
    pub fn new(settings: &SttSettings) -> Result<Self, SpeechError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SpeechError::Transcription(e.to_string()))?;

        Ok(Self {
            base_url: settings.api_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            client,
        })
    }
}

impl Transcriber for WhisperApiTranscriber {
    fn transcribe(&self, capture: &Capture) -> Result<String, SpeechError> {
        if capture.samples.is_empty() {
            return Err(SpeechError::NoSpeech);
        }
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| SpeechError::Transcription("STT_API_KEY is not set".to_string()))?;

        let wav = encode_wav(&capture.samples, capture.sample_rate)?;
        let part = reqwest::blocking::multipart::Part::bytes(wav)
            .file_name("phrase.wav")
            .mime_str("audio/wav")
            .map_err(|e| SpeechError::Transcription(e.to_string()))?;
        let form = reqwest::blocking::multipart::Form::new()
            .part("file", part)
            .text("model", self.model.clone());

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .bearer_auth(api_key)
            .multipart(form)
            .send()
            .map_err(|e| SpeechError::Transcription(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(SpeechError::Transcription(format!(
                "transcription API error {status}: {body}"
            )));
        }

        let body: TranscriptionResponse = response
            .json()
            .map_err(|e| SpeechError::Transcription(e.to_string()))?;

        if body.text.trim().is_empty() {
            return Err(SpeechError::NoSpeech);
        }
        Ok(body.text)
    }
}

/// Encode mono f32 samples as a 16-bit PCM WAV file
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, SpeechError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let to_err = |e: hound::Error| SpeechError::Transcription(format!("wav encoding failed: {e}"));

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).map_err(to_err)?;
        for &sample in samples {
            let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16;
            writer.write_sample(value).map_err(to_err)?;
        }
        writer.finalize().map_err(to_err)?;
    }

    Ok(cursor.into_inner())
}
