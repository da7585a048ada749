//! Configuration loading and management
//!
//! Everything comes from the process environment (after `.env` has been
//! merged in by `main`). Credentials are optional here: a missing key only
//! shows up when the adapter that needs it is first used.

use std::time::Duration;

use anyhow::{Context, Result};

/// Transcription service settings
#[derive(Debug, Clone)]
pub struct SttSettings {
    /// Base URL of an OpenAI-compatible API, e.g. `https://api.openai.com/v1`
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
}

/// Daemon configuration
#[derive(Clone)]
pub struct Config {
    /// Geocoding and custom search credential
    pub google_api_key: Option<String>,

    /// Custom search engine identifier
    pub google_cse_id: Option<String>,

    /// OpenWeatherMap credential
    pub openweather_api_key: Option<String>,

    pub stt: SttSettings,

    /// Language code for synthesized speech
    pub tts_lang: String,

    /// Longest phrase a single `listen()` will capture
    pub phrase_limit: Duration,

    /// Ambient-noise sampling before each phrase
    pub calibration: Duration,

    /// How long to wait for speech to start before giving up on a listen
    pub onset_timeout: Duration,
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let seconds = |key: &str, default: u64| -> Result<Duration> {
            match var(key) {
                Some(v) => v
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .with_context(|| format!("{key} must be a whole number of seconds")),
                None => Ok(Duration::from_secs(default)),
            }
        };

        let calibration = match var("EDITH_CALIBRATION_MS") {
            Some(v) => v
                .parse::<u64>()
                .map(Duration::from_millis)
                .context("EDITH_CALIBRATION_MS must be a whole number of milliseconds")?,
            None => Duration::from_millis(1000),
        };

        Ok(Self {
            google_api_key: var("GOOGLE_API_KEY"),
            google_cse_id: var("GOOGLE_CSE_ID"),
            openweather_api_key: var("OPENWEATHER_API_KEY"),
            stt: SttSettings {
                api_url: var("STT_API_URL")
                    .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
                api_key: var("STT_API_KEY"),
                model: var("STT_MODEL").unwrap_or_else(|| "whisper-1".to_string()),
            },
            tts_lang: var("EDITH_TTS_LANG").unwrap_or_else(|| "en".to_string()),
            phrase_limit: seconds("EDITH_PHRASE_LIMIT_SECS", 5)?,
            calibration,
            onset_timeout: seconds("EDITH_ONSET_TIMEOUT_SECS", 10)?,
        })
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let present = |v: &Option<String>| if v.is_some() { "set" } else { "unset" };

        f.debug_struct("Config")
            .field("google_api_key", &present(&self.google_api_key))
            .field("google_cse_id", &self.google_cse_id)
            .field("openweather_api_key", &present(&self.openweather_api_key))
            .field("stt_api_url", &self.stt.api_url)
            .field("stt_api_key", &present(&self.stt.api_key))
            .field("stt_model", &self.stt.model)
            .field("tts_lang", &self.tts_lang)
            .field("phrase_limit", &self.phrase_limit)
            .field("calibration", &self.calibration)
            .field("onset_timeout", &self.onset_timeout)
            .finish()
    }
}
