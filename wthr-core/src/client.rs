use std::sync::Arc;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error};

use crate::conditions::process_results;
use crate::error::WeatherError;
use crate::model::{COD_OK, Conditions, LocationQuery, RawWeatherResponse, Units, de_cod};
use crate::notify::RequestNotifier;

const OPENWEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// HTTP session for the OpenWeather current-weather endpoint.
///
/// Owns the reqwest client and the injected [`RequestNotifier`]; every fetch
/// is bracketed by Started/Ended notifications, success or error alike.
#[derive(Clone)]
pub struct WeatherClient {
    api_key: String,
    http: Client,
    notifier: Arc<RequestNotifier>,
}

/// Minimal envelope for the success check: the API keeps the HTTP status at
/// 200 and signals failure through `cod` + `message` instead.
#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    #[serde(deserialize_with = "de_cod")]
    cod: u16,
    #[serde(default)]
    message: Option<String>,
}

impl WeatherClient {
    pub fn new(api_key: String, notifier: Arc<RequestNotifier>) -> Self {
        Self { api_key, http: Client::new(), notifier }
    }

    pub fn notifier(&self) -> &Arc<RequestNotifier> {
        &self.notifier
    }

    /// Fetch and normalize current conditions for a place name or
    /// coordinates, in the requested units.
    pub async fn fetch_current(
        &self,
        query: &LocationQuery,
        units: Units,
    ) -> Result<Conditions, WeatherError> {
        self.notifier.request_started();
        let result = self.fetch_inner(query, units).await;
        self.notifier.request_ended();

        if let Err(err) = &result {
            error!(%err, "weather request failed");
        }
        result
    }

    async fn fetch_inner(
        &self,
        query: &LocationQuery,
        units: Units,
    ) -> Result<Conditions, WeatherError> {
        let params = build_query(query, units, &self.api_key);
        debug!(?query, %units, "calling OpenWeather");

        let res = self.http.get(OPENWEATHER_URL).query(&params).send().await?;
        let status = res.status();
        let body = res.text().await?;

        // Success is determined by the embedded cod, not the transport
        // status; coerced to a number during deserialization.
        let envelope: ApiEnvelope = serde_json::from_str(&body).map_err(|_| {
            WeatherError::MalformedResponse(format!(
                "undecodable response (HTTP {status}): {}",
                truncate_body(&body)
            ))
        })?;

        if envelope.cod != COD_OK {
            return Err(WeatherError::Api {
                cod: envelope.cod,
                message: envelope.message.unwrap_or_else(|| truncate_body(&body)),
            });
        }

        let raw: RawWeatherResponse = serde_json::from_str(&body).map_err(|e| {
            WeatherError::MalformedResponse(format!("unexpected payload shape: {e}"))
        })?;

        process_results(&raw)
    }
}

/// Query parameters for one current-weather request: `q` or `lat`+`lon`,
/// plus `units` and the API key.
pub fn build_query(query: &LocationQuery, units: Units, api_key: &str) -> Vec<(String, String)> {
    let mut params = match query {
        LocationQuery::Place(place) => vec![("q".to_string(), place.clone())],
        LocationQuery::Coords(coords) => vec![
            ("lat".to_string(), coords.lat().to_string()),
            ("lon".to_string(), coords.lon().to_string()),
        ],
    };

    params.push(("units".to_string(), units.as_str().to_string()));
    params.push(("appid".to_string(), api_key.to_string()));
    params
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    // The body is external input; cut on a char boundary so multibyte UTF-8
    // at the limit cannot panic.
    let cut = (0..=MAX).rev().find(|i| body.is_char_boundary(*i)).unwrap_or(0);
    format!("{}...", &body[..cut])
}
