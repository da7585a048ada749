//! Web action adapters
//!
//! Thin blocking clients for weather and search, plus browser navigation.
//! The weather and search adapters deliberately collapse every failure
//! (missing key, transport, bad status, odd JSON, no results) into a single
//! fallback outcome; use the `try_*` methods to see the underlying error.

mod browser;
mod error;
mod search;
mod weather;

pub use browser::{Browser, SystemBrowser};
pub use search::{CustomSearchClient, SearchOutcome, WebSearch};
pub use weather::{WeatherClient, WeatherLookup, WeatherReport, DEFAULT_LOCATION};
