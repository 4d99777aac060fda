//! Asset manifest and cache-store naming.

use serde::Serialize;

pub const CACHE_NAME_PREFIX: &str = "alpha-list-cache-";

/// Path segment that identifies sub-path hosting.
pub const SUB_PATH_MARKER: &str = "/AlphaList/";

const LOCAL_ASSETS: &[&str] = &[
    "/",
    "/index.html",
    "/style.css",
    "/script.js",
    "/data.json",
    "/assets/site.webmanifest",
    "/assets/favicon.ico",
    "/assets/apple-touch-icon.png",
    "/assets/favicon-32x32.png",
    "/assets/favicon-16x16.png",
    "/assets/android-chrome-192x192.png",
    "/assets/android-chrome-512x512.png",
];

const CDN_ASSETS: &[&str] = &[
    "https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/css/bootstrap.min.css",
    "https://cdn.jsdelivr.net/npm/bootstrap-icons@1.10.5/font/bootstrap-icons.css",
    "https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/js/bootstrap.bundle.min.js",
];

/// `alpha-list-cache-v1` for version `v1`.
pub fn cache_name(version: &str) -> String {
    format!("{CACHE_NAME_PREFIX}{version}")
}

/// `/AlphaList` when served from that sub-path, otherwise the site root.
pub fn detect_base_path(pathname: &str) -> String {
    if pathname.contains(SUB_PATH_MARKER) {
        SUB_PATH_MARKER.trim_end_matches('/').to_string()
    } else {
        String::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetManifest {
    pub base_path: String,
    pub local_assets: Vec<String>,
    pub cdn_assets: Vec<String>,
}

impl AssetManifest {
    /// Site pages, stylesheet, script, dataset and icons under `base_path`, plus pinned CDN assets.
    pub fn standard(base_path: &str) -> Self {
        let base_path = base_path.trim_end_matches('/').to_string();
        AssetManifest {
            local_assets: LOCAL_ASSETS
                .iter()
                .map(|asset| format!("{base_path}{asset}"))
                .collect(),
            cdn_assets: CDN_ASSETS.iter().map(|url| url.to_string()).collect(),
            base_path,
        }
    }

    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.local_assets
            .iter()
            .chain(self.cdn_assets.iter())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.local_assets.len() + self.cdn_assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
