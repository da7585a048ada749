//! Command dispatch: one transcript in, exactly one spoken response out

use chrono::NaiveDateTime;
use tracing::{info, warn};

use super::matcher::Intent;
use crate::speech::{SpeechError, SpeechOutput};
use crate::web::{Browser, SearchOutcome, WeatherLookup, WebSearch, DEFAULT_LOCATION};

/// Site keywords and their URLs, scanned in this order
pub const WEBSITES: [(&str, &str); 5] = [
    ("google", "https://google.com"),
    ("facebook", "https://facebook.com"),
    ("instagram", "https://instagram.com"),
    ("youtube", "https://youtube.com"),
    ("spotify", "https://open.spotify.com"),
];

/// Snippets read aloud from a search
const SPOKEN_SNIPPETS: usize = 2;

/// Words trimmed off both ends of a weather location
const LOCATION_FILLER: [&str; 15] = [
    "what's", "what", "is", "the", "how's", "how", "in", "for", "at", "like", "today", "tell",
    "me", "about", "of",
];

const HELP_MESSAGE: &str = "I can perform web searches if you say 'search' before your query";

/// Source of the current local wall-clock time
pub trait Clock: Send {
    fn now(&self) -> NaiveDateTime;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// Routes transcripts to their action and speaks the result
pub struct Dispatcher {
    weather: Box<dyn WeatherLookup>,
    search: Box<dyn WebSearch>,
    browser: Box<dyn Browser>,
    clock: Box<dyn Clock>,
}

impl Dispatcher {
    pub fn new(
        weather: Box<dyn WeatherLookup>,
        search: Box<dyn WebSearch>,
        browser: Box<dyn Browser>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            weather,
            search,
            browser,
            clock,
        }
    }

    /// Handle one non-empty transcript.
    ///
    /// Speaks exactly once. Only an output failure is returned as an error.
    pub fn handle_command(
        &self,
        command: &str,
        output: &mut dyn SpeechOutput,
    ) -> Result<Intent, SpeechError> {
        let intent = Intent::classify(command);
        let response = match intent {
            Intent::Open => self.open_website(command),
            Intent::Time => self.current_time(),
            Intent::Date => self.current_date(),
            Intent::Weather => self.weather_report(command),
            Intent::Search => self.search_results(command),
            Intent::Help => HELP_MESSAGE.to_string(),
        };

        info!(%intent, "command handled");
        output.speak(&response)?;
        Ok(intent)
    }

    fn open_website(&self, command: &str) -> String {
        let Some((site, url)) = WEBSITES.iter().find(|(site, _)| command.contains(site)) else {
            return "Website not in my database sir".to_string();
        };

        if let Err(e) = self.browser.open_url(url) {
            warn!(url, error = %e, "failed to open browser");
        }
        format!("Opening {site} sir")
    }

    fn current_time(&self) -> String {
        format!("The current time is {}", self.clock.now().format("%I:%M %p"))
    }

    fn current_date(&self) -> String {
        format!("Today's date is {}", self.clock.now().format("%B %d, %Y"))
    }

    fn weather_report(&self, command: &str) -> String {
        let location = weather_location(command);
        let report = self.weather.fetch_weather(&location);
        format!("Weather in {location}: {report}")
    }

    fn search_results(&self, command: &str) -> String {
        let query = search_query(command);
        match self.search.search(&query) {
            SearchOutcome::Snippets(snippets) => {
                let spoken: Vec<&str> = snippets
                    .iter()
                    .take(SPOKEN_SNIPPETS)
                    .map(String::as_str)
                    .collect();
                format!("Top results for {query}: {}", spoken.join(". "))
            }
            SearchOutcome::NoResults => "No relevant information found sir".to_string(),
        }
    }
}

/// Location named in a weather command, or the default location
pub fn weather_location(command: &str) -> String {
    let remainder = command.replace("weather", "");
    let mut words: Vec<&str> = remainder.split_whitespace().collect();

    // "the" stays when it opens a name, as in "the hague"
    while let Some(first) = words.first() {
        let opens_name = *first == "the"
            && words.get(1).is_some_and(|next| !is_filler(trim_trailing(next)));
        if opens_name || !is_filler(first) {
            break;
        }
        words.remove(0);
    }

    // Only the closing word loses punctuation, so "st. louis" survives
    while let Some(last) = words.last_mut() {
        *last = trim_trailing(*last);
        if !last.is_empty() && !is_filler(*last) {
            break;
        }
        words.pop();
    }

    if words.is_empty() {
        DEFAULT_LOCATION.to_string()
    } else {
        words.join(" ")
    }
}

fn is_filler(word: &str) -> bool {
    LOCATION_FILLER.contains(&word)
}

fn trim_trailing(word: &str) -> &str {
    word.trim_end_matches(|c: char| matches!(c, '.' | ',' | '?' | '!'))
}

/// Query text of a search command
pub fn search_query(command: &str) -> String {
    command.replace("search", "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::testing::{DispatcherProbe, FailingOutput, RecordingOutput};
    use crate::web::WeatherReport;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn probe() -> (Dispatcher, DispatcherProbe) {
        DispatcherProbe::new(
            at(15, 7),
            WeatherReport::Report("clear sky, 18°C".to_string()),
            SearchOutcome::Snippets(vec![
                "Preheat the oven".to_string(),
                "Use fresh dough".to_string(),
                "Bake for 12 minutes".to_string(),
            ]),
        )
    }

    #[test]
    fn test_open_every_known_site() {
        for (site, url) in WEBSITES {
            let (dispatcher, probe) = probe();
            let mut output = RecordingOutput::default();

            let intent = dispatcher
                .handle_command(&format!("open {site} please"), &mut output)
                .unwrap();

            assert_eq!(intent, Intent::Open);
            assert_eq!(probe.opened(), vec![url.to_string()]);
            assert_eq!(output.spoken(), vec![format!("Opening {site} sir")]);
        }
    }

    #[test]
    fn test_open_first_site_in_map_order() {
        let (dispatcher, probe) = probe();
        let mut output = RecordingOutput::default();
        dispatcher
            .handle_command("open spotify or google", &mut output)
            .unwrap();
        assert_eq!(probe.opened(), vec!["https://google.com".to_string()]);
    }

    #[test]
    fn test_open_unknown_site() {
        let (dispatcher, probe) = probe();
        let mut output = RecordingOutput::default();
        dispatcher
            .handle_command("open netflix", &mut output)
            .unwrap();
        assert!(probe.opened().is_empty());
        assert_eq!(output.spoken(), vec!["Website not in my database sir"]);
    }

    #[test]
    fn test_time_and_date() {
        let (dispatcher, _) = probe();
        let mut output = RecordingOutput::default();
        dispatcher
            .handle_command("what time is it", &mut output)
            .unwrap();
        dispatcher
            .handle_command("what's the date today", &mut output)
            .unwrap();
        assert_eq!(
            output.spoken(),
            vec![
                "The current time is 03:07 PM",
                "Today's date is October 19, 2026"
            ]
        );
    }

    #[test]
    fn test_weather_uses_location() {
        let (dispatcher, probe) = probe();
        let mut output = RecordingOutput::default();
        dispatcher
            .handle_command("weather in paris", &mut output)
            .unwrap();
        assert_eq!(probe.weather_asked(), vec!["paris"]);
        assert_eq!(output.spoken(), vec!["Weather in paris: clear sky, 18°C"]);
    }

    #[test]
    fn test_weather_falls_back_to_default_location() {
        let (dispatcher, probe) = probe();
        let mut output = RecordingOutput::default();
        dispatcher
            .handle_command("what's the weather", &mut output)
            .unwrap();
        assert_eq!(probe.weather_asked(), vec!["New York"]);
    }

    #[test]
    fn test_weather_failure_speaks_fallback() {
        let (dispatcher, _probe) =
            DispatcherProbe::new(at(9, 0), WeatherReport::Unavailable, SearchOutcome::NoResults);
        let mut output = RecordingOutput::default();
        dispatcher
            .handle_command("weather london", &mut output)
            .unwrap();
        assert_eq!(
            output.spoken(),
            vec!["Weather in london: Unable to retrieve weather data"]
        );
    }

    #[test]
    fn test_search_speaks_first_two_snippets() {
        let (dispatcher, probe) = probe();
        let mut output = RecordingOutput::default();
        let intent = dispatcher
            .handle_command("search best pizza recipe", &mut output)
            .unwrap();
        assert_eq!(intent, Intent::Search);
        assert_eq!(probe.search_asked(), vec!["best pizza recipe"]);
        assert_eq!(
            output.spoken(),
            vec!["Top results for best pizza recipe: Preheat the oven. Use fresh dough"]
        );
    }

    #[test]
    fn test_search_failure_speaks_fallback() {
        let (dispatcher, _probe) =
            DispatcherProbe::new(at(9, 0), WeatherReport::Unavailable, SearchOutcome::NoResults);
        let mut output = RecordingOutput::default();
        dispatcher
            .handle_command("search quantum tea", &mut output)
            .unwrap();
        assert_eq!(output.spoken(), vec!["No relevant information found sir"]);
    }

    #[test]
    fn test_weather_beats_search() {
        let (dispatcher, probe) = probe();
        let mut output = RecordingOutput::default();
        let intent = dispatcher
            .handle_command("search the weather in rome", &mut output)
            .unwrap();
        assert_eq!(intent, Intent::Weather);
        assert!(probe.search_asked().is_empty());
        assert_eq!(output.spoken().len(), 1);
    }

    #[test]
    fn test_unmatched_command_speaks_help() {
        let (dispatcher, _) = probe();
        let mut output = RecordingOutput::default();
        let intent = dispatcher
            .handle_command("sing me a song", &mut output)
            .unwrap();
        assert_eq!(intent, Intent::Help);
        assert_eq!(output.spoken(), vec![HELP_MESSAGE]);
    }

    #[test]
    fn test_output_failure_propagates() {
        let (dispatcher, _) = probe();
        let mut output = FailingOutput;
        assert!(dispatcher
            .handle_command("what time is it", &mut output)
            .is_err());
    }

    #[test]
    fn test_weather_location_extraction() {
        assert_eq!(weather_location("weather"), "New York");
        assert_eq!(weather_location("how's the weather today?"), "New York");
        assert_eq!(weather_location("weather new york city"), "new york city");
        assert_eq!(
            weather_location("what's the weather like in london today"),
            "london"
        );
    }

    #[test]
    fn test_weather_location_keeps_names_intact() {
        assert_eq!(weather_location("weather st. louis"), "st. louis");
        assert_eq!(weather_location("weather in the hague"), "the hague");
        assert_eq!(weather_location("what's the weather in the hague?"), "the hague");
        assert_eq!(weather_location("the weather in paris, today!"), "paris");
        assert_eq!(weather_location("what is the weather"), "New York");
    }

    #[test]
    fn test_search_query_extraction() {
        assert_eq!(search_query("search best pizza recipe"), "best pizza recipe");
        assert_eq!(search_query("  search   "), "");
    }
}
