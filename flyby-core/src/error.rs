use thiserror::Error;

pub type Result<T> = std::result::Result<T, FlybyError>;

/// Failure kinds of a flyby prediction.
#[derive(Debug, Error)]
pub enum FlybyError {
    #[error(
        "Invalid coordinates ({latitude}, {longitude}): latitude must be in [-90, 90] and longitude in [-180, 180]"
    )]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[error("Insufficient data to calculate prediction: {count} capture(s), at least 2 required")]
    InsufficientData { count: usize },

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("All captures share the same timestamp, the mean revisit interval is zero")]
    ZeroInterval,

    #[error("Projected capture time is outside the representable date range")]
    OutOfRange,
}

/// Everything that can go wrong between sending the query and holding a parsed body.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The URL carries the API key, so it is stripped from the error.
    #[error("Failed to send request to imagery API: {0}")]
    Transport(reqwest::Error),

    #[error("Imagery API request failed with status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to parse imagery API JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        RequestError::Transport(err.without_url())
    }
}

impl FlybyError {
    /// Short machine-friendly name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            FlybyError::InvalidCoordinate { .. } => "invalid-coordinate",
            FlybyError::InsufficientData { .. } => "insufficient-data",
            FlybyError::Request(_) => "request",
            FlybyError::ZeroInterval => "zero-interval",
            FlybyError::OutOfRange => "out-of-range",
        }
    }
}
