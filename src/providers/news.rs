//! News lookup backed by a NewsAPI-style article search

use anyhow::{Context, Result, bail};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// Client for the article search endpoint
pub struct NewsClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

/// Raw article search payload; only the first article is consumed
#[derive(Debug, Clone, Deserialize)]
pub struct NewsPayload {
    /// Matching articles, page size 1 so at most one entry
    #[serde(default)]
    pub articles: Vec<Article>,
}

/// One article from the search result
#[derive(Debug, Clone, Deserialize)]
pub struct Article {
    /// Headline text
    #[serde(default)]
    pub title: Option<String>,
    /// Article summary, used when the title is absent
    #[serde(default)]
    pub description: Option<String>,
    /// Lead image URL
    #[serde(default, rename = "urlToImage")]
    pub url_to_image: Option<String>,
}

impl NewsClient {
    /// Create a new news client
    pub fn new<S: Into<String>>(http: Client, base_url: S, api_key: Option<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key,
        }
    }

    /// Fetch the single most relevant article for a search term.
    ///
    /// # Errors
    ///
    /// Returns an error when no API key is configured, on network failure,
    /// non-2xx status or a malformed body.
    pub async fn top_article(&self, term: &str) -> Result<NewsPayload> {
        let Some(api_key) = self.api_key.as_deref() else {
            bail!("no news API key configured");
        };

        let url = search_url(&self.base_url, term, api_key);
        debug!("News request for term: {term}");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| "News request failed")?
            .error_for_status()
            .with_context(|| "News provider returned an error status")?;

        let payload = response
            .json()
            .await
            .with_context(|| "Failed to parse news response")?;

        Ok(payload)
    }
}

/// Article search URL with the term and key percent-encoded
fn search_url(base_url: &str, term: &str, api_key: &str) -> String {
    format!(
        "{}/everything?q={}&pageSize=1&apiKey={}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(term),
        urlencoding::encode(api_key)
    )
}
