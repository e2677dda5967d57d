use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::{
    config::ProviderConfig,
    error::WeatherError,
    model::{WeatherBlock, WeatherEnvelope},
};

use super::WeatherProvider;

/// Client for the Meizu `listWeather` endpoint.
#[derive(Debug, Clone)]
pub struct MeizuProvider {
    endpoint: String,
    http: Client,
}

impl MeizuProvider {
    /// `timeout` of `None` leaves requests without a deadline.
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            endpoint: endpoint.into(),
            http,
        })
    }

    pub fn from_config(config: &ProviderConfig) -> anyhow::Result<Self> {
        Self::new(config.endpoint.clone(), config.timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl WeatherProvider for MeizuProvider {
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn fetch(&self, provider_id: &str) -> Result<WeatherBlock, WeatherError> {
        let res = self
            .http
            .get(&self.endpoint)
            .query(&[("cityIds", provider_id)])
            .send()
            .await
            .map_err(|e| WeatherError::UpstreamRequest(e.to_string()))?;

        let status = res.status();
        debug!(%status, "weather provider responded");

        if !status.is_success() {
            return Err(WeatherError::UpstreamTransport {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = res
            .text()
            .await
            .map_err(|e| WeatherError::UpstreamRequest(e.to_string()))?;

        let raw: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| WeatherError::UpstreamFormat(format!("{e}: {}", truncate_body(&body))))?;

        WeatherEnvelope::from(raw).into_first_block()
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
