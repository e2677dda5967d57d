use std::fmt::Debug;

use async_trait::async_trait;

use crate::{config::ProviderConfig, error::WeatherError, model::WeatherBlock};

pub mod meizu;

pub use meizu::MeizuProvider;

/// Source of raw weather blocks keyed by provider city id.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fetch and validate the payload for one city, returning its first block.
    async fn fetch(&self, provider_id: &str) -> Result<WeatherBlock, WeatherError>;
}

/// Construct the provider described by the configuration.
pub fn provider_from_config(config: &ProviderConfig) -> anyhow::Result<Box<dyn WeatherProvider>> {
    Ok(Box::new(MeizuProvider::from_config(config)?))
}
