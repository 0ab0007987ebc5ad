use thiserror::Error;

/// Every failure the widget can surface. All variants are non-fatal: the
/// caller reports them and stays interactive.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The HTTP call itself failed (connect, TLS, body read).
    #[error("network error calling the weather API: {0}")]
    Transport(#[from] reqwest::Error),

    /// The call succeeded but the embedded `cod` field reported failure.
    #[error("weather API reported failure (cod {cod}): {message}")]
    Api { cod: u16, message: String },

    /// Location input was invalid or unavailable.
    #[error("location error: {0}. Try a place name instead.")]
    Geolocation(String),

    /// Response body did not decode into the expected shape, including an
    /// empty `weather` array.
    #[error("malformed weather response: {0}")]
    MalformedResponse(String),
}
