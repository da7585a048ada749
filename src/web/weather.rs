//! Weather lookup: geocode a free-text location, then query current
//! conditions at those coordinates

use std::fmt;

use serde::Deserialize;
use tracing::{debug, warn};

use super::error::WebError;

/// Location used when a command names none
pub const DEFAULT_LOCATION: &str = "New York";

/// Spoken in place of a report when any step of the lookup fails
pub const WEATHER_UNAVAILABLE: &str = "Unable to retrieve weather data";

const GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
const WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Outcome of a collapsed weather lookup
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherReport {
    /// `"{description}, {temp}°C"`
    Report(String),
    Unavailable,
}

impl fmt::Display for WeatherReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeatherReport::Report(report) => f.write_str(report),
            WeatherReport::Unavailable => f.write_str(WEATHER_UNAVAILABLE),
        }
    }
}

/// Something that can report the weather for a location
pub trait WeatherLookup: Send {
    fn fetch_weather(&self, location: &str) -> WeatherReport;
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Coordinates,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
struct Coordinates {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    weather: Vec<Condition>,
    main: Readings,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct Readings {
    temp: f64,
}

impl CurrentWeather {
    fn describe(&self) -> Result<String, WebError> {
        let condition = self
            .weather
            .first()
            .ok_or_else(|| WebError::Malformed("weather conditions missing".to_string()))?;
        Ok(format!("{}, {}°C", condition.description, self.main.temp))
    }
}

/// Google geocoding + OpenWeatherMap client
#[derive(Debug, Clone)]
pub struct WeatherClient {
    geocode_url: String,
    weather_url: String,
    google_api_key: Option<String>,
    openweather_api_key: Option<String>,
    client: reqwest::blocking::Client,
}

impl WeatherClient {
    pub fn new(google_api_key: Option<String>, openweather_api_key: Option<String>) -> Self {
        Self {
            geocode_url: GEOCODE_URL.to_string(),
            weather_url: WEATHER_URL.to_string(),
            google_api_key,
            openweather_api_key,
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Look up the weather, reporting exactly what went wrong on failure
    pub fn try_fetch_weather(&self, location: &str) -> Result<String, WebError> {
        let coordinates = self.geocode(location)?;
        debug!(location, lat = coordinates.lat, lng = coordinates.lng, "location geocoded");

        let key = self
            .openweather_api_key
            .as_deref()
            .ok_or(WebError::MissingCredential("OPENWEATHER_API_KEY"))?;

        let current: CurrentWeather = self
            .client
            .get(&self.weather_url)
            .query(&[
                ("lat", coordinates.lat.to_string().as_str()),
                ("lon", coordinates.lng.to_string().as_str()),
                ("appid", key),
                ("units", "metric"),
            ])
            .send()?
            .error_for_status()?
            .json()?;

        current.describe()
    }

    fn geocode(&self, location: &str) -> Result<Coordinates, WebError> {
        let key = self
            .google_api_key
            .as_deref()
            .ok_or(WebError::MissingCredential("GOOGLE_API_KEY"))?;

        let response: GeocodeResponse = self
            .client
            .get(&self.geocode_url)
            .query(&[("address", location), ("key", key)])
            .send()?
            .error_for_status()?
            .json()?;

        response
            .results
            .first()
            .map(|r| r.geometry.location)
            .ok_or_else(|| WebError::Empty(location.to_string()))
    }
}

impl WeatherLookup for WeatherClient {
    fn fetch_weather(&self, location: &str) -> WeatherReport {
        let location = match location.trim() {
            "" => DEFAULT_LOCATION,
            named => named,
        };

        match self.try_fetch_weather(location) {
            Ok(report) => WeatherReport::Report(report),
            Err(e) => {
                warn!(location, error = %e, "weather lookup failed");
                WeatherReport::Unavailable
            }
        }
    }
}
