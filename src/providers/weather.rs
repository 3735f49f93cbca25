//! Weather lookup backed by an OpenWeatherMap-style current-weather API

use anyhow::{Context, Result, bail};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// Client for the current-weather endpoint
pub struct WeatherClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

/// Raw current-weather payload; only description and temperature are consumed
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherPayload {
    /// Condition list, first entry carries the description
    #[serde(default, rename = "weather")]
    pub conditions: Vec<WeatherCondition>,
    /// Main readings block
    #[serde(default)]
    pub main: Option<MainReadings>,
}

/// One weather condition entry
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherCondition {
    /// Human-readable condition description
    #[serde(default)]
    pub description: Option<String>,
}

/// Temperature readings
#[derive(Debug, Clone, Deserialize)]
pub struct MainReadings {
    /// Temperature in the requested units (imperial, so Fahrenheit)
    #[serde(default)]
    pub temp: Option<f64>,
}

impl WeatherClient {
    /// Create a new weather client
    pub fn new<S: Into<String>>(http: Client, base_url: S, api_key: Option<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key,
        }
    }

    /// Fetch current weather for a destination in imperial units.
    ///
    /// # Errors
    ///
    /// Returns an error when no API key is configured, on network failure,
    /// non-2xx status or a malformed body.
    pub async fn current(&self, destination: &str) -> Result<WeatherPayload> {
        let Some(api_key) = self.api_key.as_deref() else {
            bail!("no weather API key configured");
        };

        let url = current_url(&self.base_url, destination, api_key);
        debug!("Weather request for destination: {destination}");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| "Weather request failed")?
            .error_for_status()
            .with_context(|| "Weather provider returned an error status")?;

        let payload = response
            .json()
            .await
            .with_context(|| "Failed to parse weather response")?;

        Ok(payload)
    }
}

/// Current-weather URL with destination and key percent-encoded
fn current_url(base_url: &str, destination: &str, api_key: &str) -> String {
    format!(
        "{}/weather?q={}&appid={}&units=imperial",
        base_url.trim_end_matches('/'),
        urlencoding::encode(destination),
        urlencoding::encode(api_key)
    )
}
