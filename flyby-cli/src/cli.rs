use anyhow::{Context, anyhow};
use chrono::{DateTime, Duration, Utc};
use clap::{Parser, Subcommand};
use flyby_core::{
    Config, Coordinate, Prediction,
    config::DEFAULT_ENDPOINT,
    flyby,
    model::parse_timestamp,
    provider_from_config,
};
use inquire::{CustomType, Password, PasswordDisplayMode, Text, validator::Validation};
use std::path::PathBuf;

use crate::batch;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "flyby", version, about = "Predict the next satellite imagery capture of a location")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the imagery API key, endpoint and request timeout.
    Configure,

    /// Predict the next capture of a single location.
    Predict {
        /// Latitude in degrees, [-90, 90].
        #[arg(allow_negative_numbers = true)]
        latitude: f64,

        /// Longitude in degrees, [-180, 180].
        #[arg(allow_negative_numbers = true)]
        longitude: f64,

        #[command(flatten)]
        window: Window,
    },

    /// Predict the next capture for every location in a TOML file.
    Batch {
        /// File with `[[location]]` entries (label, latitude, longitude).
        file: PathBuf,

        #[command(flatten)]
        window: Window,
    },
}

#[derive(Debug, clap::Args)]
pub struct Window {
    /// Reference time instead of the current time, e.g. 2024-01-10 or 2024-01-10T12:00:00Z.
    #[arg(long, value_parser = parse_time)]
    now: Option<DateTime<Utc>>,

    /// Only consider captures on or after this date.
    #[arg(long, value_parser = parse_time)]
    since: Option<DateTime<Utc>>,
}

impl Window {
    fn now(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now)
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Predict { latitude, longitude, window } => {
                let config = Config::load()?;
                let provider = provider_from_config(&config)?;
                let coordinate = Coordinate::new(latitude, longitude)?;

                let prediction =
                    flyby(provider.as_ref(), coordinate, window.now(), window.since).await?;
                print_prediction(&prediction);
                Ok(())
            }
            Command::Batch { file, window } => {
                let locations = batch::load_locations(&file)?;
                let config = Config::load()?;
                let provider = provider_from_config(&config)?;

                let mut out = std::io::stdout();
                let summary = batch::run_batch(
                    provider.as_ref(),
                    &locations,
                    window.now(),
                    window.since,
                    &mut out,
                )
                .await?;

                if summary.failed > 0 {
                    tracing::warn!(failed = summary.failed, "some locations could not be predicted");
                }
                Ok(())
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load_file()?;

    let api_key = Password::new("API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Get one at https://api.nasa.gov")
        .prompt()
        .context("Failed to read API key")?;
    if api_key.trim().is_empty() {
        return Err(anyhow!("API key must not be empty"));
    }

    let endpoint = Text::new("Endpoint:")
        .with_default(config.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT))
        .prompt()
        .context("Failed to read endpoint")?;

    let timeout_secs = CustomType::<u64>::new("Request timeout (seconds):")
        .with_default(config.timeout().as_secs())
        .with_error_message("Please enter a whole number of seconds")
        .with_validator(|secs: &u64| {
            Ok(if *secs == 0 {
                Validation::Invalid("Timeout must be at least 1 second".into())
            } else {
                Validation::Valid
            })
        })
        .prompt()
        .context("Failed to read timeout")?;

    config.api_key = Some(api_key.trim().to_string());
    config.endpoint = (endpoint != DEFAULT_ENDPOINT).then_some(endpoint);
    config.timeout_secs = Some(timeout_secs);
    config.save()?;

    println!("Configuration saved to {}", Config::config_file_path()?.display());
    Ok(())
}

fn print_prediction(prediction: &Prediction) {
    println!("Next time: {}", prediction.next_capture.format("%Y-%m-%dT%H:%M:%S%.f"));
    println!(
        "  latest capture {} | mean revisit {} over {} interval(s)",
        prediction.statistic.latest.format("%Y-%m-%dT%H:%M:%S"),
        format_interval(prediction.statistic.mean_interval),
        prediction.statistic.gaps,
    );
}

fn parse_time(s: &str) -> Result<DateTime<Utc>, String> {
    parse_timestamp(s).ok_or_else(|| format!("'{s}' is not a date (expected e.g. 2024-01-10 or RFC 3339)"))
}

/// Render a duration as `16d 0h 12m 5s`.
pub fn format_interval(d: Duration) -> String {
    let total = d.num_seconds();
    let (days, rem) = (total / 86_400, total % 86_400);
    format!("{}d {}h {}m {}s", days, rem / 3_600, (rem % 3_600) / 60, rem % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_interval_splits_units() {
        assert_eq!(format_interval(Duration::days(16)), "16d 0h 0m 0s");
        assert_eq!(format_interval(Duration::seconds(90_061)), "1d 1h 1m 1s");
    }

    #[test]
    fn predict_accepts_negative_coordinates() {
        let cli = Cli::try_parse_from(["flyby", "predict", "-7.607874", "-180", "--now", "2024-01-10"])
            .expect("should parse");

        match cli.command {
            Command::Predict { latitude, longitude, window } => {
                assert_eq!(latitude, -7.607874);
                assert_eq!(longitude, -180.0);
                assert_eq!(window.now, parse_timestamp("2024-01-10"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn bad_now_is_rejected() {
        let res = Cli::try_parse_from(["flyby", "predict", "0", "0", "--now", "soon"]);
        assert!(res.is_err());
    }
}
