//! Test doubles for the speech and web adapters

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::NaiveDateTime;

use crate::intent::{Clock, Dispatcher};
use crate::speech::{SpeechError, SpeechInput, SpeechOutput};
use crate::web::{Browser, SearchOutcome, WeatherLookup, WeatherReport, WebSearch};

type Log = Arc<Mutex<Vec<String>>>;

fn snapshot(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Replays transcripts in order, then reports silence
#[derive(Debug, Default)]
pub struct ScriptedInput {
    transcripts: VecDeque<String>,
}

impl ScriptedInput {
    pub fn new(transcripts: &[&str]) -> Self {
        Self {
            transcripts: transcripts.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl SpeechInput for ScriptedInput {
    fn listen(&mut self) -> String {
        self.transcripts.pop_front().unwrap_or_default()
    }
}

/// Keeps every utterance; clones share the same log
#[derive(Debug, Default, Clone)]
pub struct RecordingOutput {
    spoken: Log,
}

impl RecordingOutput {
    pub fn spoken(&self) -> Vec<String> {
        snapshot(&self.spoken)
    }
}

impl SpeechOutput for RecordingOutput {
    fn speak(&mut self, text: &str) -> Result<(), SpeechError> {
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Output whose playback always fails
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingOutput;

impl SpeechOutput for FailingOutput {
    fn speak(&mut self, _text: &str) -> Result<(), SpeechError> {
        Err(SpeechError::Playback("no output device".to_string()))
    }
}

struct RecordingBrowser(Log);

impl Browser for RecordingBrowser {
    fn open_url(&self, url: &str) -> std::io::Result<()> {
        self.0.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

struct FixedClock(NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

struct CannedWeather {
    report: WeatherReport,
    asked: Log,
}

impl WeatherLookup for CannedWeather {
    fn fetch_weather(&self, location: &str) -> WeatherReport {
        self.asked.lock().unwrap().push(location.to_string());
        self.report.clone()
    }
}

struct CannedSearch {
    outcome: SearchOutcome,
    asked: Log,
}

impl WebSearch for CannedSearch {
    fn search(&self, query: &str) -> SearchOutcome {
        self.asked.lock().unwrap().push(query.to_string());
        self.outcome.clone()
    }
}

/// Views of what a canned-adapter dispatcher asked for
pub struct DispatcherProbe {
    opened: Log,
    weather_asked: Log,
    search_asked: Log,
}

impl DispatcherProbe {
    /// Build a dispatcher wired to canned adapters, plus its probe
    pub fn new(
        now: NaiveDateTime,
        weather: WeatherReport,
        search: SearchOutcome,
    ) -> (Dispatcher, Self) {
        let opened = Log::default();
        let weather_asked = Log::default();
        let search_asked = Log::default();

        let dispatcher = Dispatcher::new(
            Box::new(CannedWeather {
                report: weather,
                asked: Arc::clone(&weather_asked),
            }),
            Box::new(CannedSearch {
                outcome: search,
                asked: Arc::clone(&search_asked),
            }),
            Box::new(RecordingBrowser(Arc::clone(&opened))),
            Box::new(FixedClock(now)),
        );

        let probe = Self {
            opened,
            weather_asked,
            search_asked,
        };
        (dispatcher, probe)
    }

    /// Probe with neutral canned answers
    pub fn idle() -> (Dispatcher, Self) {
        let now = chrono::NaiveDate::from_ymd_opt(2026, 1, 1)
            .and_then(|d| d.and_hms_opt(8, 0, 0))
            .unwrap();
        Self::new(now, WeatherReport::Unavailable, SearchOutcome::NoResults)
    }

    pub fn opened(&self) -> Vec<String> {
        snapshot(&self.opened)
    }

    pub fn weather_asked(&self) -> Vec<String> {
        snapshot(&self.weather_asked)
    }

    pub fn search_asked(&self) -> Vec<String> {
        snapshot(&self.search_asked)
    }
}
