use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use flyby_core::{Coordinate, FlybyError, ImageryProvider, Prediction, flyby};
use serde::Deserialize;
use std::{fs, io::Write, path::Path};

/// One labelled entry of a locations file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Location {
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
struct LocationsFile {
    #[serde(default, rename = "location")]
    locations: Vec<Location>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub passed: usize,
    pub failed: usize,
}

pub fn load_locations(path: &Path) -> Result<Vec<Location>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read locations file: {}", path.display()))?;

    parse_locations(&contents)
        .with_context(|| format!("Failed to parse locations file: {}", path.display()))
}

fn parse_locations(contents: &str) -> Result<Vec<Location>> {
    let file: LocationsFile = toml::from_str(contents)?;
    Ok(file.locations)
}

/// Predict every location in order, one result line each.
///
/// A failing location is reported and skipped; only write errors abort the batch.
pub async fn run_batch(
    provider: &dyn ImageryProvider,
    locations: &[Location],
    now: DateTime<Utc>,
    begin: Option<DateTime<Utc>>,
    out: &mut impl Write,
) -> Result<BatchSummary> {
    let mut summary = BatchSummary::default();

    for loc in locations {
        match predict_one(provider, loc, now, begin).await {
            Ok(prediction) => {
                summary.passed += 1;
                writeln!(
                    out,
                    "ok    {} ({}, {}): next time {}",
                    loc.label,
                    loc.latitude,
                    loc.longitude,
                    prediction.next_capture.format("%Y-%m-%dT%H:%M:%S"),
                )?;
            }
            Err(err) => {
                summary.failed += 1;
                tracing::debug!(label = %loc.label, kind = err.kind(), "location failed");
                writeln!(out, "FAIL  {} ({}, {}): {}", loc.label, loc.latitude, loc.longitude, err)?;
            }
        }
    }

    writeln!(out, "{} passed, {} failed", summary.passed, summary.failed)?;
    Ok(summary)
}

async fn predict_one(
    provider: &dyn ImageryProvider,
    loc: &Location,
    now: DateTime<Utc>,
    begin: Option<DateTime<Utc>>,
) -> std::result::Result<Prediction, FlybyError> {
    let coordinate = Coordinate::new(loc.latitude, loc.longitude)?;
    flyby(provider, coordinate, now, begin).await
}
