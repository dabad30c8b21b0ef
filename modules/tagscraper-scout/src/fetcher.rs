use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;
use tracing::{debug, warn};
use url::Url;

use tagscraper_common::{Result, ScrapeError};

use crate::traits::PageFetcher;

/// Plain HTTP GET over one shared client.
///
/// A semaphore caps the number of requests in flight across every channel
/// and key, so a large batch never opens more than `max_connections` sockets
/// to the target sites at once.
pub struct HttpFetcher {
    client: reqwest::Client,
    semaphore: Semaphore,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, max_connections: usize) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(max_connections)
            .build()
            .map_err(|e| ScrapeError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            semaphore: Semaphore::new(max_connections),
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn get(&self, url: &Url) -> Result<String> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| ScrapeError::fetch(url.as_str(), e))?;

        debug!(url = url.as_str(), "GET");
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ScrapeError::fetch(url.as_str(), e))?;

        let status = resp.status();
        if !status.is_success() {
            warn!(url = url.as_str(), status = status.as_u16(), "non-success response");
            return Err(ScrapeError::fetch(
                url.as_str(),
                format!("status {}", status.as_u16()),
            ));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| ScrapeError::fetch(url.as_str(), e))?;
        if body.trim().is_empty() {
            return Err(ScrapeError::fetch(url.as_str(), "empty response body"));
        }
        Ok(body)
    }
}
