//! JSON documents served over HTTP.

use anyhow::{anyhow, Context, Result};
use std::time::Duration;
use tracing::debug;

/// Fetches `<base_url>/<collection>.json`.
#[derive(Debug, Clone)]
pub struct HttpSource {
    base_url: String,
    timeout_seconds: u64,
    client: reqwest::Client,
}

impl HttpSource {
    /// Create a source for the given base URL.
    pub fn new(base_url: &str, timeout_seconds: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_seconds,
            client,
        })
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of one collection.
    pub fn collection_url(&self, name: &str) -> String {
        format!("{}/{}.json", self.base_url, name)
    }

    /// Fetch one collection.
    pub async fn read(&self, name: &'static str) -> Result<String> {
        let url = self.collection_url(name);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                anyhow!("Request to {} timed out after {}s", url, self.timeout_seconds)
            } else {
                anyhow!("Failed to fetch {}: {}", url, e)
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(anyhow!("{} returned status {}", url, status));
        }

        response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", url))
    }
}
