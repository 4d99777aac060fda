//! Named cache stores holding responses keyed by request URL.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::offline::{CachedResponse, OfflineError};

/// A set of named stores. Writing to a store that was never opened creates it.
pub trait CacheStorage: Send + Sync {
    /// Create the store if absent.
    fn open(&self, cache: &str) -> Result<(), OfflineError>;
    fn keys(&self) -> Result<Vec<String>, OfflineError>;
    /// Returns whether a store was removed.
    fn delete(&self, cache: &str) -> Result<bool, OfflineError>;
    /// Insert or overwrite the entry for `response.url`.
    fn put(&self, cache: &str, response: &CachedResponse) -> Result<(), OfflineError>;
    fn lookup(&self, cache: &str, url: &str) -> Result<Option<CachedResponse>, OfflineError>;
    fn entry_count(&self, cache: &str) -> Result<usize, OfflineError>;
}

impl<T: CacheStorage + ?Sized> CacheStorage for Arc<T> {
    fn open(&self, cache: &str) -> Result<(), OfflineError> {
        (**self).open(cache)
    }

    fn keys(&self) -> Result<Vec<String>, OfflineError> {
        (**self).keys()
    }

    fn delete(&self, cache: &str) -> Result<bool, OfflineError> {
        (**self).delete(cache)
    }

    fn put(&self, cache: &str, response: &CachedResponse) -> Result<(), OfflineError> {
        (**self).put(cache, response)
    }

    fn lookup(&self, cache: &str, url: &str) -> Result<Option<CachedResponse>, OfflineError> {
        (**self).lookup(cache, url)
    }

    fn entry_count(&self, cache: &str) -> Result<usize, OfflineError> {
        (**self).entry_count(cache)
    }
}

type Stores = BTreeMap<String, BTreeMap<String, CachedResponse>>;

#[derive(Debug, Default)]
pub struct MemoryCacheStorage {
    stores: Mutex<Stores>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn stores(&self) -> MutexGuard<'_, Stores> {
        self.stores.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CacheStorage for MemoryCacheStorage {
    fn open(&self, cache: &str) -> Result<(), OfflineError> {
        self.stores().entry(cache.to_string()).or_default();
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, OfflineError> {
        Ok(self.stores().keys().cloned().collect())
    }

    fn delete(&self, cache: &str) -> Result<bool, OfflineError> {
        Ok(self.stores().remove(cache).is_some())
    }

    fn put(&self, cache: &str, response: &CachedResponse) -> Result<(), OfflineError> {
        self.stores()
            .entry(cache.to_string())
            .or_default()
            .insert(response.url.clone(), response.clone());
        Ok(())
    }

    fn lookup(&self, cache: &str, url: &str) -> Result<Option<CachedResponse>, OfflineError> {
        Ok(self
            .stores()
            .get(cache)
            .and_then(|store| store.get(url))
            .cloned())
    }

    fn entry_count(&self, cache: &str) -> Result<usize, OfflineError> {
        Ok(self.stores().get(cache).map_or(0, BTreeMap::len))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct EntryMeta {
    url: String,
    status: u16,
    #[serde(default)]
    content_type: Option<String>,
}

/// One directory per store under `root`; each entry is `<sha256(url)>.json` metadata plus a
/// `<sha256(url)>.body` payload.
#[derive(Debug, Clone)]
pub struct DiskCacheStorage {
    root: PathBuf,
}

impl DiskCacheStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DiskCacheStorage { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn store_dir(&self, cache: &str) -> Result<PathBuf, OfflineError> {
        if cache.is_empty() || cache.contains(['/', '\\']) || cache.contains("..") {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid cache name '{cache}'"),
            )
            .into());
        }
        Ok(self.root.join(cache))
    }

    fn entry_stem(url: &str) -> String {
        hex::encode(Sha256::digest(url.as_bytes()))
    }
}

impl CacheStorage for DiskCacheStorage {
    fn open(&self, cache: &str) -> Result<(), OfflineError> {
        fs::create_dir_all(self.store_dir(cache)?)?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, OfflineError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    fn delete(&self, cache: &str) -> Result<bool, OfflineError> {
        let dir = self.store_dir(cache)?;
        match fs::remove_dir_all(&dir) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn put(&self, cache: &str, response: &CachedResponse) -> Result<(), OfflineError> {
        let dir = self.store_dir(cache)?;
        fs::create_dir_all(&dir)?;
        let stem = Self::entry_stem(&response.url);
        let meta = EntryMeta {
            url: response.url.clone(),
            status: response.status,
            content_type: response.content_type.clone(),
        };
        fs::write(dir.join(format!("{stem}.body")), &response.body)?;
        fs::write(dir.join(format!("{stem}.json")), serde_json::to_vec_pretty(&meta)?)?;
        Ok(())
    }

    fn lookup(&self, cache: &str, url: &str) -> Result<Option<CachedResponse>, OfflineError> {
        let dir = self.store_dir(cache)?;
        let stem = Self::entry_stem(url);
        let raw_meta = match fs::read(dir.join(format!("{stem}.json"))) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let meta: EntryMeta = serde_json::from_slice(&raw_meta)?;
        let body = fs::read(dir.join(format!("{stem}.body")))?;
        Ok(Some(CachedResponse {
            url: meta.url,
            status: meta.status,
            content_type: meta.content_type,
            body,
        }))
    }

    fn entry_count(&self, cache: &str) -> Result<usize, OfflineError> {
        let dir = self.store_dir(cache)?;
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(err) => return Err(err.into()),
        };
        let mut count = 0;
        for entry in entries {
            if entry?.path().extension().is_some_and(|ext| ext == "json") {
                count += 1;
            }
        }
        Ok(count)
    }
}
