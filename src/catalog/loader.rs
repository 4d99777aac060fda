//! Read the dataset from disk or over HTTP. Remote loads carry a cache-busting token.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::catalog::record::RawDataset;

pub const DEFAULT_DATASET_PATH: &str = "data/data.json";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read dataset '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse dataset: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to fetch dataset from '{url}': {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

pub fn parse_dataset(raw: &str) -> Result<RawDataset, CatalogError> {
    Ok(serde_json::from_str(raw)?)
}

pub fn load_dataset(path: impl AsRef<Path>) -> Result<RawDataset, CatalogError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let dataset = parse_dataset(&raw)?;
    tracing::info!(path = %path.display(), regions = dataset.len(), "loaded dataset");
    Ok(dataset)
}

/// Append `v=<token>`, respecting an existing query string.
pub fn cache_busted_url(url: &str, token: i64) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}v={token}")
}

/// Fetch the dataset with the current time in milliseconds as the cache-busting token.
pub async fn fetch_dataset(url: &str) -> Result<RawDataset, CatalogError> {
    let busted = cache_busted_url(url, chrono::Utc::now().timestamp_millis());
    let fetch_error = |source| CatalogError::Fetch {
        url: busted.clone(),
        source,
    };

    let response = reqwest::get(&busted)
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(fetch_error)?;
    let body = response.text().await.map_err(fetch_error)?;
    let dataset = parse_dataset(&body)?;
    tracing::info!(url = %busted, regions = dataset.len(), "fetched dataset");
    Ok(dataset)
}
