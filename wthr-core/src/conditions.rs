//! Result normalization and temperature unit conversion.
//!
//! Both halves are pure: `process_results` maps a raw API payload to the flat
//! [`Conditions`] record the UI displays, and the two converters swap the
//! three temperature fields between Fahrenheit and Celsius.

use chrono::{DateTime, Utc};

use crate::error::WeatherError;
use crate::model::{Conditions, RawWeatherResponse};

/// Simplify the weather data returned from the API.
///
/// Temperatures are rounded half away from zero (`f64::round`). An empty
/// `weather` array is reported as [`WeatherError::MalformedResponse`] rather
/// than an index panic.
pub fn process_results(raw: &RawWeatherResponse) -> Result<Conditions, WeatherError> {
    let entry = raw.weather.first().ok_or_else(|| {
        WeatherError::MalformedResponse("response contained no weather entries".to_string())
    })?;

    Ok(Conditions {
        code: entry.id,
        name: raw.name.clone(),
        current: raw.main.temp.round() as i64,
        low: raw.main.temp_min.round() as i64,
        high: raw.main.temp_max.round() as i64,
        description: entry.main.clone(),
        description_full: entry.description.clone(),
        observed_at: raw.dt.and_then(unix_to_utc).unwrap_or_else(Utc::now),
    })
}

/// Convert `current`, `low` and `high` from Fahrenheit to Celsius.
/// All other fields pass through unchanged.
pub fn fahrenheit_to_celsius(mut conditions: Conditions) -> Conditions {
    conditions.current = f_to_c(conditions.current);
    conditions.low = f_to_c(conditions.low);
    conditions.high = f_to_c(conditions.high);
    conditions
}

/// Convert `current`, `low` and `high` from Celsius to Fahrenheit.
/// All other fields pass through unchanged.
pub fn celsius_to_fahrenheit(mut conditions: Conditions) -> Conditions {
    conditions.current = c_to_f(conditions.current);
    conditions.low = c_to_f(conditions.low);
    conditions.high = c_to_f(conditions.high);
    conditions
}

// Rounded once, after the full expression. Round trips over integer degrees
// may drift by ±1.
fn f_to_c(f: i64) -> i64 {
    ((f as f64 - 32.0) * 5.0 / 9.0).round() as i64
}

fn c_to_f(c: i64) -> i64 {
    (c as f64 * 9.0 / 5.0 + 32.0).round() as i64
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MainReadings, WeatherEntry};

    fn paris() -> RawWeatherResponse {
        RawWeatherResponse {
            name: "Paris".to_string(),
            weather: vec![WeatherEntry {
                id: 800,
                main: "Clear".to_string(),
                description: "clear sky".to_string(),
            }],
            main: MainReadings { temp: 73.0, temp_min: 70.0, temp_max: 77.0 },
            dt: Some(1_412_953_200),
            cod: 200,
        }
    }

    #[test]
    fn normalizes_the_paris_payload() {
        let conditions = process_results(&paris()).expect("payload is well-formed");

        assert_eq!(conditions.code, 800);
        assert_eq!(conditions.name, "Paris");
        assert_eq!(conditions.current, 73);
        assert_eq!(conditions.low, 70);
        assert_eq!(conditions.high, 77);
        assert_eq!(conditions.description, "Clear");
        assert_eq!(conditions.description_full, "clear sky");
    }

    #[test]
    fn rounds_half_away_from_zero() {
        // Documented rounding rule: f64::round, i.e. 0.5 -> 1 and -0.5 -> -1.
        let mut raw = paris();
        raw.main = MainReadings { temp: 72.5, temp_min: -0.5, temp_max: 76.4 };

        let conditions = process_results(&raw).expect("payload is well-formed");
        assert_eq!(conditions.current, 73);
        assert_eq!(conditions.low, -1);
        assert_eq!(conditions.high, 76);
    }

    #[test]
    fn empty_weather_is_a_malformed_response() {
        let mut raw = paris();
        raw.weather.clear();

        let err = process_results(&raw).unwrap_err();
        assert!(matches!(err, WeatherError::MalformedResponse(_)));
        assert!(err.to_string().contains("no weather entries"));
    }

    #[test]
    fn f_to_c_converts_the_paris_conditions() {
        let conditions = process_results(&paris()).expect("payload is well-formed");
        let converted = fahrenheit_to_celsius(conditions);

        assert_eq!(converted.current, 23);
        assert_eq!(converted.low, 21);
        assert_eq!(converted.high, 25);
    }

    #[test]
    fn conversion_leaves_non_temperature_fields_alone() {
        let conditions = process_results(&paris()).expect("payload is well-formed");
        let before = conditions.clone();
        let converted = fahrenheit_to_celsius(conditions);

        assert_eq!(converted.code, before.code);
        assert_eq!(converted.name, before.name);
        assert_eq!(converted.description, before.description);
        assert_eq!(converted.description_full, before.description_full);
        assert_eq!(converted.observed_at, before.observed_at);
    }

    #[test]
    fn round_trip_stays_within_one_degree() {
        // Integer rounding makes F -> C -> F lossy by at most one degree;
        // exact equality is not part of the contract.
        let base = process_results(&paris()).expect("payload is well-formed");

        for f in -50..=150 {
            let mut conditions = base.clone();
            conditions.current = f;
            conditions.low = f;
            conditions.high = f;

            let back = celsius_to_fahrenheit(fahrenheit_to_celsius(conditions));
            assert!(
                (back.current - f).abs() <= 1,
                "round trip drifted more than 1 degree at {f}: got {}",
                back.current
            );
        }
    }
}
