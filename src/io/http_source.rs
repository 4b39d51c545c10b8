use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, StatusCode};
use url::Url;

use super::DocumentSource;
use crate::error::FetchError;

/// Default per-request timeout.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP-backed implementation of DocumentSource.
///
/// Issues one GET per document. Every request carries the timeout given at
/// construction, so a stalled endpoint costs at most one timeout per document.
#[derive(Clone)]
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    /// Create a new HttpSource whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(Self { client })
    }

    /// Create an HttpSource around an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn parse_url(location: &str) -> Result<Url, FetchError> {
        Url::parse(location).map_err(|_| FetchError::InvalidLocation(location.to_string()))
    }

    async fn get(&self, location: &str) -> Result<reqwest::Response, FetchError> {
        let url = Self::parse_url(location)?;
        self.client
            .get(url)
            .send()
            .await
            .map_err(|e| map_reqwest_error(location, e))
    }
}

impl Default for HttpSource {
    fn default() -> Self {
        Self::with_client(Client::new())
    }
}

fn map_reqwest_error(location: &str, err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout(location.to_string())
    } else {
        FetchError::Transport(err.to_string())
    }
}

#[async_trait]
impl DocumentSource for HttpSource {
    async fn fetch(&self, location: &str) -> Result<Bytes, FetchError> {
        let response = self.get(location).await?;

        match response.status() {
            status if status.is_success() => response
                .bytes()
                .await
                .map_err(|e| map_reqwest_error(location, e)),
            StatusCode::NOT_FOUND => Err(FetchError::NotFound(location.to_string())),
            status => Err(FetchError::Status {
                status: status.as_u16(),
                location: location.to_string(),
            }),
        }
    }

    async fn probe(&self, location: &str) -> Result<bool, FetchError> {
        let response = self.get(location).await?;
        Ok(response.status().is_success())
    }

    fn identifier(&self) -> &str {
        "http"
    }
}
