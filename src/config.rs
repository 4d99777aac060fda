//! Process configuration from `ALPHALIST_*` environment variables.

use std::env;
use std::path::PathBuf;

use crate::catalog::loader::DEFAULT_DATASET_PATH;

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_SITE_DIR: &str = "site";
pub const DEFAULT_CACHE_DIR: &str = ".alphalist-cache";
pub const DEFAULT_CACHE_VERSION: &str = "v1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: String,
    pub data_path: PathBuf,
    pub site_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub cache_version: String,
    /// Prefix for manifest paths when the site is hosted under a sub-path.
    pub base_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Unset or blank values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str, default: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        AppConfig {
            bind_addr: get("ALPHALIST_BIND", DEFAULT_BIND),
            data_path: PathBuf::from(get("ALPHALIST_DATA", DEFAULT_DATASET_PATH)),
            site_dir: PathBuf::from(get("ALPHALIST_SITE_DIR", DEFAULT_SITE_DIR)),
            cache_dir: PathBuf::from(get("ALPHALIST_CACHE_DIR", DEFAULT_CACHE_DIR)),
            cache_version: get("ALPHALIST_CACHE_VERSION", DEFAULT_CACHE_VERSION),
            base_path: get("ALPHALIST_BASE_PATH", ""),
        }
    }
}
