//! Offline asset cache: versioned population, stale-store eviction, network-first fetch.

use thiserror::Error;

pub mod controller;
pub mod manifest;
pub mod network;
pub mod storage;

pub use controller::{ActivateReport, CacheState, InstallPolicy, InstallReport, OfflineCacheController};
pub use manifest::{cache_name, detect_base_path, AssetManifest};
pub use network::{HttpNetwork, Network};
pub use storage::{CacheStorage, DiskCacheStorage, MemoryCacheStorage};

/// A response as stored in, and served from, a cache store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl CachedResponse {
    pub fn ok(url: impl Into<String>, content_type: Option<&str>, body: impl Into<Vec<u8>>) -> Self {
        CachedResponse {
            url: url.into(),
            status: 200,
            content_type: content_type.map(str::to_string),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Error)]
pub enum OfflineError {
    #[error("network request for '{url}' failed: {message}")]
    Network { url: String, message: String },
    #[error("'{url}' answered with status {status}")]
    BadStatus { url: String, status: u16 },
    #[error("cache storage error: {0}")]
    Storage(#[from] std::io::Error),
    #[error("cache metadata error: {0}")]
    Metadata(#[from] serde_json::Error),
    #[error("'{url}' is unreachable and not cached")]
    Unavailable { url: String },
}
