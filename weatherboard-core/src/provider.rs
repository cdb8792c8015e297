use crate::{Config, error::FetchError, model::WeatherRecord, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Source of current weather readings, one city per call.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, city: &str) -> Result<WeatherRecord, FetchError>;
}

/// Construct the provider described by `config`.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    if config.has_placeholder_key() {
        tracing::warn!(
            "No API key configured; requests will use the placeholder key and most likely fail. \
             Hint: run `weatherboard configure` or pass --api-key."
        );
    }

    Ok(Box::new(OpenWeatherProvider::from_config(config)?))
}
