//! HTTP retrieval of the special's page.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use crate::errors::FetchError;
use crate::pipeline::ContentFetcher;

/// [`ContentFetcher`] backed by `reqwest`. One GET per call, no retries.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds a fetcher whose requests give up after `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build HTTP client with timeout, using defaults: {}", e);
                Client::new()
            });
        Self { client }
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::new(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(url, format!("HTTP status {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::new(url, e.to_string()))?;
        debug!(url = %url, bytes = body.len(), "Fetched special page");
        Ok(body)
    }
}
