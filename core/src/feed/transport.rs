//! HTTP seam between the feed client and the network.

use crate::prelude::{FetchError, FetchResult};
use async_trait::async_trait;
use url::Url;

/// Raw HTTP response: status code and undecoded body.
#[derive(Debug, Clone)]
pub struct FeedResponse {
    pub status: u16,
    pub body: String,
}

impl FeedResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait FeedTransport: Send + Sync {
    /// Issues one GET. No retries and no timeout beyond the transport default.
    async fn get(&self, url: &Url) -> FetchResult<FeedResponse>;
}

/// Production transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Builds a client with default settings, surfacing TLS backend failures.
    pub fn build() -> Result<Self, reqwest::Error> {
        Ok(Self::new(reqwest::Client::builder().build()?))
    }
}

#[async_trait]
impl FeedTransport for ReqwestTransport {
    async fn get(&self, url: &Url) -> FetchResult<FeedResponse> {
        log::debug!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::connection(format!("GET {} failed: {}", url.path(), e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::connection(format!("reading response body: {}", e)))?;

        log::debug!("GET {} -> {} ({} bytes)", url.path(), status, body.len());
        Ok(FeedResponse { status, body })
    }
}
