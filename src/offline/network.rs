use std::time::Duration;

use async_trait::async_trait;

use crate::offline::{CachedResponse, OfflineError};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Outgoing requests. Any HTTP answer, whatever its status, is `Ok`; only transport failures
/// are errors.
#[async_trait]
pub trait Network: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<CachedResponse, OfflineError>;
}

/// reqwest-backed network; site-relative paths resolve against `origin`.
#[derive(Debug, Clone)]
pub struct HttpNetwork {
    client: reqwest::Client,
    origin: String,
}

impl HttpNetwork {
    pub fn new(origin: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|err| {
                tracing::warn!(error = %err, "falling back to default http client");
                reqwest::Client::new()
            });
        HttpNetwork {
            client,
            origin: origin.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn resolve(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else if url.starts_with('/') {
            format!("{}{url}", self.origin)
        } else {
            format!("{}/{url}", self.origin)
        }
    }
}

#[async_trait]
impl Network for HttpNetwork {
    async fn fetch(&self, url: &str) -> Result<CachedResponse, OfflineError> {
        let target = self.resolve(url);
        let network_error = |err: reqwest::Error| OfflineError::Network {
            url: target.clone(),
            message: err.to_string(),
        };

        let response = self.client.get(&target).send().await.map_err(network_error)?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(network_error)?.to_vec();
        tracing::debug!(url = %target, status, bytes = body.len(), "network response");

        Ok(CachedResponse {
            url: url.to_string(),
            status,
            content_type,
            body,
        })
    }
}
