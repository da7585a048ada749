//! Text-to-speech via the Google Translate speech endpoint
//!
//! The endpoint is keyless and returns MP3, but only accepts short inputs,
//! so longer replies are split on word boundaries and the MP3 chunks are
//! concatenated.

use std::time::Duration;

use tracing::debug;

use super::error::SpeechError;

/// Longest text the endpoint accepts in one request
const MAX_CHUNK_CHARS: usize = 100;

const TRANSLATE_TTS_URL: &str = "https://translate.google.com/translate_tts";

/// Turns text into encoded audio bytes
pub trait Synthesizer: Send {
    fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError>;
}

/// Synthesizer backed by Google Translate TTS
#[derive(Debug, Clone)]
pub struct GoogleTranslateTts {
    endpoint: String,
    lang: String,
    client: reqwest::blocking::Client,
}

impl GoogleTranslateTts {
    pub fn new(lang: impl Into<String>) -> Result<Self, SpeechError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SpeechError::Synthesis(e.to_string()))?;

        Ok(Self {
            endpoint: TRANSLATE_TTS_URL.to_string(),
            lang: lang.into(),
            client,
        })
    }

    fn fetch_chunk(&self, chunk: &str, idx: usize, total: usize) -> Result<Vec<u8>, SpeechError> {
        let idx = idx.to_string();
        let total = total.to_string();
        let textlen = chunk.chars().count().to_string();

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", self.lang.as_str()),
                ("q", chunk),
                ("idx", idx.as_str()),
                ("total", total.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| SpeechError::Synthesis(e.to_string()))?;

        let bytes = response
            .bytes()
            .map_err(|e| SpeechError::Synthesis(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

impl Synthesizer for GoogleTranslateTts {
    fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        let chunks = split_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(SpeechError::Synthesis("nothing to synthesize".to_string()));
        }

        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            audio.extend(self.fetch_chunk(chunk, idx, chunks.len())?);
        }
        debug!(chunks = chunks.len(), bytes = audio.len(), "speech synthesized");

        Ok(audio)
    }
}

/// Split `text` into pieces of at most `max_chars` characters, breaking on
/// whitespace where possible
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word.to_string();

        while word.chars().count() > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            let head: String = word.chars().take(max_chars).collect();
            word = word.chars().skip(max_chars).collect();
            chunks.push(head);
        }

        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
