//! Cache lifecycle: install populates the versioned store, activate evicts every other store,
//! fetch goes to the network first and falls back to the stored copy.

use serde::Serialize;

use crate::offline::manifest::{cache_name, AssetManifest};
use crate::offline::network::Network;
use crate::offline::storage::CacheStorage;
use crate::offline::{CachedResponse, OfflineError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallPolicy {
    /// Any unreachable asset aborts the install and nothing is written.
    #[default]
    Atomic,
    /// Reachable assets are written; failures are reported.
    BestEffort,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedAsset {
    pub url: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallReport {
    pub cache: String,
    pub stored: usize,
    pub failed: Vec<FailedAsset>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivateReport {
    pub cache: String,
    pub deleted: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "caches", rename_all = "snake_case")]
pub enum CacheState {
    Empty,
    Populated(String),
    /// More than one store exists, e.g. after installing a new version but before activation.
    Mixed(Vec<String>),
}

pub struct OfflineCacheController<S, N> {
    cache: String,
    manifest: AssetManifest,
    policy: InstallPolicy,
    storage: S,
    network: N,
}

impl<S, N> OfflineCacheController<S, N>
where
    S: CacheStorage,
    N: Network,
{
    pub fn new(version: &str, manifest: AssetManifest, storage: S, network: N) -> Self {
        OfflineCacheController {
            cache: cache_name(version),
            manifest,
            policy: InstallPolicy::default(),
            storage,
            network,
        }
    }

    pub fn with_policy(mut self, policy: InstallPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn cache_name(&self) -> &str {
        &self.cache
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn manifest(&self) -> &AssetManifest {
        &self.manifest
    }

    pub async fn install(&self) -> Result<InstallReport, OfflineError> {
        self.storage.open(&self.cache)?;

        let mut fetched = Vec::with_capacity(self.manifest.len());
        let mut failed = Vec::new();
        for url in self.manifest.urls() {
            match self.fetch_asset(url).await {
                Ok(response) => fetched.push(response),
                Err(err) if self.policy == InstallPolicy::BestEffort => {
                    tracing::warn!(url, error = %err, "skipping asset during install");
                    failed.push(FailedAsset {
                        url: url.to_string(),
                        reason: err.to_string(),
                    });
                }
                Err(err) => {
                    tracing::error!(url, error = %err, cache = %self.cache, "install aborted");
                    return Err(err);
                }
            }
        }

        for response in &fetched {
            self.storage.put(&self.cache, response)?;
        }
        tracing::info!(cache = %self.cache, stored = fetched.len(), failed = failed.len(), "install complete");

        Ok(InstallReport {
            cache: self.cache.clone(),
            stored: fetched.len(),
            failed,
        })
    }

    async fn fetch_asset(&self, url: &str) -> Result<CachedResponse, OfflineError> {
        let response = self.network.fetch(url).await?;
        if !response.is_success() {
            return Err(OfflineError::BadStatus {
                url: url.to_string(),
                status: response.status,
            });
        }
        Ok(response)
    }

    /// Delete every store except the current one.
    pub fn activate(&self) -> Result<ActivateReport, OfflineError> {
        let mut deleted = Vec::new();
        for name in self.storage.keys()? {
            if name != self.cache && self.storage.delete(&name)? {
                tracing::info!(cache = %name, "evicted stale cache");
                deleted.push(name);
            }
        }
        Ok(ActivateReport {
            cache: self.cache.clone(),
            deleted,
        })
    }

    /// Network first. Any network answer replaces the stored copy; on transport failure the
    /// stored copy is served if there is one.
    pub async fn fetch(&self, url: &str) -> Result<CachedResponse, OfflineError> {
        match self.network.fetch(url).await {
            Ok(response) => {
                // Write failures are logged only; the live answer is still returned.
                if let Err(err) = self.storage.put(&self.cache, &response) {
                    tracing::warn!(url, error = %err, cache = %self.cache, "failed to cache response");
                }
                Ok(response)
            }
            Err(err) => {
                tracing::debug!(url, error = %err, "network failed, trying cache");
                self.storage
                    .lookup(&self.cache, url)?
                    .ok_or_else(|| OfflineError::Unavailable {
                        url: url.to_string(),
                    })
            }
        }
    }

    pub fn state(&self) -> Result<CacheState, OfflineError> {
        let mut names = self.storage.keys()?;
        Ok(match names.len() {
            0 => CacheState::Empty,
            1 => CacheState::Populated(names.remove(0)),
            _ => CacheState::Mixed(names),
        })
    }
}
