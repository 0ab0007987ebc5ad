//! Core library for the `wthr` weather widget.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather HTTP client with its request notification channel
//! - Result normalization and temperature unit conversion
//!
//! It is used by `wthr-cli`, but can also be reused by other binaries or services.

pub mod client;
pub mod conditions;
pub mod config;
pub mod error;
pub mod model;
pub mod notify;

pub use client::WeatherClient;
pub use conditions::{celsius_to_fahrenheit, fahrenheit_to_celsius, process_results};
pub use config::Config;
pub use error::WeatherError;
pub use model::{Conditions, Coordinates, LocationQuery, RawWeatherResponse, Units};
pub use notify::RequestNotifier;
