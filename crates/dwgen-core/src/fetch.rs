//! Remote text retrieval for devfiles and editor definitions.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use crate::config::HttpSection;
use crate::error::{Error, Result};

/// Fetches documents over HTTP(S).
///
/// Implementations must be shareable across tasks so one fetcher can serve
/// both the devfile and the editor lookups.
#[async_trait]
pub trait UrlFetcher: Send + Sync {
    /// Fetch the body of `url`, failing on any non-success status.
    async fn fetch_text(&self, url: &str) -> Result<String>;

    /// Fetch the body of `url`, mapping 404 to `None`.
    async fn fetch_text_optional(&self, url: &str) -> Result<Option<String>>;
}

/// [`UrlFetcher`] backed by a reqwest client.
#[derive(Debug, Clone)]
pub struct HttpUrlFetcher {
    client: reqwest::Client,
}

impl HttpUrlFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    pub fn from_config(http: &HttpSection) -> Result<Self> {
        Self::new(&http.user_agent(), http.timeout())
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        debug!("Fetching {}", url);
        self.client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Fetch {
                url: url.to_string(),
                message: e.to_string(),
            })
    }

    async fn body(url: &str, response: reqwest::Response) -> Result<String> {
        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().await.map_err(|e| Error::Fetch {
            url: url.to_string(),
            message: format!("Failed to read response body: {}", e),
        })
    }
}

#[async_trait]
impl UrlFetcher for HttpUrlFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self.get(url).await?;
        Self::body(url, response).await
    }

    async fn fetch_text_optional(&self, url: &str) -> Result<Option<String>> {
        let response = self.get(url).await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!("{} not found", url);
            return Ok(None);
        }
        Self::body(url, response).await.map(Some)
    }
}
