use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Confirm, Text};

use wthr_core::{
    Conditions, Config, Coordinates, LocationQuery, RequestNotifier, Units, WeatherClient,
    celsius_to_fahrenheit, fahrenheit_to_celsius,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "wthr", version, about = "Current weather for a place or coordinates")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show current conditions for a place name or coordinates.
    Show {
        /// Place name, e.g. "Paris". Omit when using --lat/--lon.
        place: Option<String>,

        /// Latitude in degrees; requires --lon.
        #[arg(long, requires = "lon", conflicts_with = "place")]
        lat: Option<f64>,

        /// Longitude in degrees; requires --lat.
        #[arg(long, requires = "lat", conflicts_with = "place")]
        lon: Option<f64>,

        /// Request units: imperial or metric.
        #[arg(long, default_value = "imperial", value_parser = parse_units)]
        units: Units,

        /// Print once and exit, skipping the interactive unit toggle.
        #[arg(long)]
        no_toggle: bool,
    },
}

fn parse_units(s: &str) -> anyhow::Result<Units> {
    Units::try_from(s)
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { place, lat, lon, units, no_toggle } => {
                show(place, lat, lon, units, no_toggle).await
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Text::new("OpenWeather API key:")
        .prompt()
        .context("Failed to read API key from prompt")?;
    if api_key.trim().is_empty() {
        bail!("API key cannot be empty");
    }

    config.set_api_key(api_key.trim().to_string());
    config.save()?;

    println!("Saved to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(
    place: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    mut units: Units,
    no_toggle: bool,
) -> anyhow::Result<()> {
    let config = Config::load()?;
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured.\n\
             Hint: run `wthr configure` and enter your OpenWeather API key."
        )
    })?;

    let query = match (place, lat, lon) {
        (Some(place), _, _) => LocationQuery::Place(place),
        (None, Some(lat), Some(lon)) => LocationQuery::Coords(Coordinates::new(lat, lon)?),
        _ => bail!("Provide a place name, or both --lat and --lon."),
    };

    let notifier = Arc::new(RequestNotifier::new());
    notifier.on_request_started(|| eprintln!("Fetching current conditions..."));
    notifier.on_request_ended(|| eprintln!("Done."));

    let client = WeatherClient::new(api_key.to_string(), Arc::clone(&notifier));
    let mut conditions = client.fetch_current(&query, units).await?;

    print_conditions(&conditions, units);

    // Conversion happens client-side, on the already-fetched record.
    while !no_toggle {
        let prompt = format!("Show in {}?", units.toggled().degrees());
        match Confirm::new(&prompt).with_default(false).prompt() {
            Ok(true) => {
                conditions = match units {
                    Units::Imperial => fahrenheit_to_celsius(conditions),
                    Units::Metric => celsius_to_fahrenheit(conditions),
                };
                units = units.toggled();
                print_conditions(&conditions, units);
            }
            // "no", or a non-interactive stdin.
            Ok(false) | Err(_) => break,
        }
    }

    Ok(())
}

fn print_conditions(conditions: &Conditions, units: Units) {
    let deg = units.degrees();
    let observed = conditions.observed_at.with_timezone(&chrono::Local);

    println!();
    println!("{}: {} ({})", conditions.name, conditions.description, conditions.description_full);
    println!(
        "  current {}{deg}   low {}{deg}   high {}{deg}",
        conditions.current, conditions.low, conditions.high
    );
    println!("  observed {}", observed.format("%Y-%m-%d %H:%M"));
}
