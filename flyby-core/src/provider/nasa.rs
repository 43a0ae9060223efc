use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{
    error::{FlybyError, RequestError, Result},
    model::{CaptureQuery, CaptureSet},
};

use super::ImageryProvider;

/// Client for the NASA Earth imagery "assets" endpoint.
#[derive(Debug, Clone)]
pub struct NasaAssetsProvider {
    endpoint: String,
    api_key: String,
    http: Client,
}

impl NasaAssetsProvider {
    /// `timeout` bounds the whole request; there are no retries.
    pub fn new(endpoint: String, api_key: String, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self::with_client(endpoint, api_key, http))
    }

    pub(crate) fn with_client(endpoint: String, api_key: String, http: Client) -> Self {
        Self { endpoint, api_key, http }
    }

    fn query_params(&self, query: &CaptureQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("lon", query.coordinate.longitude().to_string()),
            ("lat", query.coordinate.latitude().to_string()),
            ("end", query.end.format("%Y-%m-%dT%H:%M:%S").to_string()),
        ];
        if let Some(begin) = query.begin {
            params.push(("begin", begin.format("%Y-%m-%d").to_string()));
        }
        params
    }
}

#[async_trait]
impl ImageryProvider for NasaAssetsProvider {
    async fn fetch_captures(&self, query: &CaptureQuery) -> Result<CaptureSet> {
        let params = self.query_params(query);
        debug!(endpoint = %self.endpoint, ?params, "requesting capture history");

        let res = self
            .http
            .get(&self.endpoint)
            .query(&params)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await
            .map_err(RequestError::from)?;

        let status = res.status();
        let body = res.text().await.map_err(RequestError::from)?;

        if !status.is_success() {
            return Err(RequestError::Status { status, body: truncate_body(&body) }.into());
        }

        decode_captures(&body)
    }
}

/// Parse an assets response body and check it holds enough captures to predict from.
pub fn decode_captures(body: &str) -> Result<CaptureSet> {
    let set: CaptureSet = serde_json::from_str(body).map_err(RequestError::Decode)?;

    if set.count != set.results.len() {
        warn!(count = set.count, results = set.results.len(), "declared count differs from results");
    }

    if set.count < 2 {
        return Err(FlybyError::InsufficientData { count: set.count });
    }

    Ok(set)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
