use crate::{
    Config,
    error::Result,
    model::{CaptureQuery, CaptureSet},
    provider::nasa::NasaAssetsProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod nasa;

/// Source of historical captures for a location.
#[async_trait]
pub trait ImageryProvider: Send + Sync + Debug {
    /// Fetch the captures of `query.coordinate` up to `query.end`.
    ///
    /// Implementations fail with `InsufficientData` when fewer than two
    /// captures are reported.
    async fn fetch_captures(&self, query: &CaptureQuery) -> Result<CaptureSet>;
}

/// Construct the imagery provider described by the config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn ImageryProvider>> {
    let api_key = config.require_api_key()?;

    let provider =
        NasaAssetsProvider::new(config.endpoint().to_owned(), api_key.to_owned(), config.timeout())?;

    Ok(Box::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No API key configured"));
    }

    #[test]
    fn provider_from_config_works_when_key_set() {
        let cfg = Config { api_key: Some("KEY".to_string()), ..Config::default() };

        let provider = provider_from_config(&cfg);
        assert!(provider.is_ok());
    }
}
