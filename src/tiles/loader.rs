use async_trait::async_trait;
use once_cell::sync::Lazy;

use crate::constants::{FETCH_TIMEOUT_SECS, USER_AGENT};
use crate::{MapError, Result};

/// Shared async HTTP client with a custom User-Agent so that public tile
/// servers (e.g. OpenStreetMap) don't reject the request. Building the client
/// once avoids the cost of TLS and connection pool setup for every render.
pub(crate) static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(std::time::Duration::from_secs(FETCH_TIMEOUT_SECS))
        .pool_idle_timeout(std::time::Duration::from_secs(90))
        .build()
        .unwrap_or_else(|e| {
            log::warn!("falling back to default HTTP client: {}", e);
            reqwest::Client::new()
        })
});

/// Fetches raw tile bytes by URL.
#[async_trait]
pub trait TileFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Default fetcher backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: HTTP_CLIENT.clone(),
        }
    }

    /// Use a caller-configured client (proxies, custom headers, ...).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TileFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        log::debug!("fetch tile {}", url);
        let resp = self.client.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(MapError::Http {
                url: url.to_string(),
                status: resp.status().as_u16(),
            });
        }
        let bytes = resp.bytes().await?;
        log::debug!("downloaded tile {} ({} bytes)", url, bytes.len());
        Ok(bytes.to_vec())
    }
}
