//! Place resolver backed by a Nominatim-style geocoding API

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// Client for the geocoding search endpoint
pub struct GeocodingClient {
    http: Client,
    base_url: String,
}

/// One geocoding search hit; only the display name is consumed
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingHit {
    /// Full display name of the matched place
    #[serde(default)]
    pub display_name: Option<String>,
}

impl GeocodingClient {
    /// Create a new geocoding client
    pub fn new<S: Into<String>>(http: Client, base_url: S) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Search for a destination, returning at most one hit.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, non-2xx status or a body that is
    /// not the expected JSON array.
    pub async fn search(&self, destination: &str) -> Result<Vec<GeocodingHit>> {
        let url = search_url(&self.base_url, destination);
        debug!("Geocoding request URL: {url}");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| "Geocoding request failed")?
            .error_for_status()
            .with_context(|| "Geocoding provider returned an error status")?;

        let hits = response
            .json()
            .await
            .with_context(|| "Failed to parse geocoding response")?;

        Ok(hits)
    }
}

/// Search URL with the destination percent-encoded as a query value
fn search_url(base_url: &str, destination: &str) -> String {
    format!(
        "{}/search?q={}&format=json&limit=1",
        base_url.trim_end_matches('/'),
        urlencoding::encode(destination)
    )
}
