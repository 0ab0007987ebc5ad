use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::error::WeatherError;

/// Current-weather payload as returned by the OpenWeather API.
///
/// Only the fields the widget displays are deserialized; everything else in
/// the response body is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawWeatherResponse {
    pub name: String,
    pub weather: Vec<WeatherEntry>,
    pub main: MainReadings,

    /// Unix observation timestamp; absent in some historical payloads.
    #[serde(default)]
    pub dt: Option<i64>,

    /// The API's own status indicator, independent of the HTTP status.
    /// Arrives as `200` or `"200"` depending on endpoint vintage.
    #[serde(deserialize_with = "de_cod")]
    pub cod: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherEntry {
    pub id: i64,
    /// Short description, e.g. "Clear".
    pub main: String,
    /// Long description, e.g. "clear sky".
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub temp_min: f64,
    pub temp_max: f64,
}

/// Embedded status code for the API success check.
pub const COD_OK: u16 = 200;

/// Accept the `cod` field as either a JSON number or a numeric string.
pub(crate) fn de_cod<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Cod {
        Num(u16),
        Text(String),
    }

    match Cod::deserialize(deserializer)? {
        Cod::Num(n) => Ok(n),
        Cod::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("non-numeric cod value: {s:?}"))),
    }
}

/// Normalized weather display record derived from a raw API response.
///
/// Built fresh on every successful fetch. Unit conversion replaces the three
/// temperature fields and leaves everything else untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conditions {
    pub code: i64,
    pub name: String,
    pub current: i64,
    pub low: i64,
    pub high: i64,
    /// Short description, e.g. "Clear".
    pub description: String,
    /// Long description, e.g. "clear sky".
    pub description_full: String,
    pub observed_at: DateTime<Utc>,
}

/// Temperature units forwarded to the API; client-side conversion uses the
/// same names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Units {
    #[default]
    Imperial,
    Metric,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Imperial => "imperial",
            Units::Metric => "metric",
        }
    }

    pub fn degrees(&self) -> &'static str {
        match self {
            Units::Imperial => "°F",
            Units::Metric => "°C",
        }
    }

    pub fn toggled(&self) -> Units {
        match self {
            Units::Imperial => Units::Metric,
            Units::Metric => Units::Imperial,
        }
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "imperial" => Ok(Units::Imperial),
            "metric" => Ok(Units::Metric),
            _ => Err(anyhow::anyhow!(
                "Unknown units '{value}'. Supported units: imperial, metric."
            )),
        }
    }
}

/// What the user asked for: a place name or geolocation coordinates.
#[derive(Debug, Clone)]
pub enum LocationQuery {
    Place(String),
    Coords(Coordinates),
}

/// Validated geographic coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    lat: f64,
    lon: f64,
}

impl Coordinates {
    /// Range-check the pair; the coordinate source itself (browser prompt,
    /// CLI flag) is outside the core.
    pub fn new(lat: f64, lon: f64) -> Result<Self, WeatherError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(WeatherError::Geolocation(format!(
                "latitude {lat} is outside -90..=90"
            )));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(WeatherError::Geolocation(format!(
                "longitude {lon} is outside -180..=180"
            )));
        }

        Ok(Self { lat, lon })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}
