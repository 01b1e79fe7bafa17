use crate::{
    Config, FetchOutcome, WeatherObservation, WeatherQuery,
    provider::openweather::OpenWeatherClient,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// A remote weather data source.
///
/// One call is one request: implementations must not retry or fall back.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn fetch_weather(&self, query: &WeatherQuery) -> FetchOutcome<WeatherObservation>;
}

/// Construct the weather source from config.
///
/// A missing API key is reported here, at startup, rather than per fetch.
pub fn source_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherSource>> {
    let api_key = config.api_key()?;

    let client = OpenWeatherClient::builder(api_key)
        .base_url(config.base_url())
        .timeout(config.timeout())
        .build()?;

    Ok(Arc::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = source_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No API key configured"));
    }

    #[test]
    fn source_from_config_works_when_key_set() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());

        let source = source_from_config(&cfg);
        assert!(source.is_ok());
    }
}
