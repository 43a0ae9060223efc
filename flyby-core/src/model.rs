use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{FlybyError, Result};

/// A validated latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Boundaries are inclusive; NaN is rejected.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(FlybyError::InvalidCoordinate { latitude, longitude });
        }

        Ok(Self { latitude, longitude })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// What to ask the imagery provider for.
#[derive(Debug, Clone)]
pub struct CaptureQuery {
    pub coordinate: Coordinate,
    /// Latest capture time of interest, normally "now".
    pub end: DateTime<Utc>,
    /// Optional lower bound on capture time.
    pub begin: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureRecord {
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub id: Option<String>,
}

/// Body of an assets query: declared count plus the capture records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureSet {
    pub count: usize,
    #[serde(default)]
    pub results: Vec<CaptureRecord>,
}

impl CaptureSet {
    pub fn from_dates(dates: impl IntoIterator<Item = DateTime<Utc>>) -> Self {
        let results: Vec<CaptureRecord> =
            dates.into_iter().map(|date| CaptureRecord { date, id: None }).collect();

        Self { count: results.len(), results }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalStatistic {
    pub earliest: DateTime<Utc>,
    pub latest: DateTime<Utc>,
    /// Number of consecutive gaps the mean was taken over.
    pub gaps: usize,
    pub mean_interval: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prediction {
    pub next_capture: DateTime<Utc>,
    pub statistic: IntervalStatistic,
    /// How many mean intervals were added to the latest capture.
    pub intervals_ahead: i64,
}

/// Parse a capture timestamp as the imagery API and users write them.
///
/// Accepts RFC 3339, a naive ISO-8601 datetime with optional fractional
/// seconds (taken as UTC), or a bare calendar date (midnight UTC).
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ndt.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| ndt.and_utc())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_timestamp(&s)
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognized capture date '{s}'")))
}
