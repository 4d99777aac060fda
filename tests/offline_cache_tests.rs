use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use alphalist::offline::{
    AssetManifest, CacheState, CacheStorage, CachedResponse, InstallPolicy, MemoryCacheStorage,
    Network, OfflineCacheController, OfflineError,
};
use async_trait::async_trait;

/// Answers from a fixed table; unknown URLs are transport failures. Can be taken offline.
#[derive(Clone, Default)]
struct ScriptedNetwork {
    responses: Arc<HashMap<String, CachedResponse>>,
    offline: Arc<AtomicBool>,
}

impl ScriptedNetwork {
    fn serving(manifest: &AssetManifest, skip: &[&str]) -> Self {
        let responses = manifest
            .urls()
            .filter(|url| !skip.contains(url))
            .map(|url| (url.to_string(), CachedResponse::ok(url, Some("text/plain"), format!("body of {url}"))))
            .collect();
        ScriptedNetwork {
            responses: Arc::new(responses),
            offline: Arc::new(AtomicBool::new(false)),
        }
    }

    fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Network for ScriptedNetwork {
    async fn fetch(&self, url: &str) -> Result<CachedResponse, OfflineError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(OfflineError::Network {
                url: url.to_string(),
                message: "offline".to_string(),
            });
        }
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| OfflineError::Network {
                url: url.to_string(),
                message: "connection refused".to_string(),
            })
    }
}

fn controller(
    version: &str,
    storage: Arc<MemoryCacheStorage>,
    network: ScriptedNetwork,
) -> OfflineCacheController<Arc<MemoryCacheStorage>, ScriptedNetwork> {
    OfflineCacheController::new(version, AssetManifest::standard(""), storage, network)
}

#[tokio::test]
async fn install_populates_the_versioned_store() {
    let manifest = AssetManifest::standard("");
    let storage = Arc::new(MemoryCacheStorage::new());
    let worker = controller("v1", storage.clone(), ScriptedNetwork::serving(&manifest, &[]));

    assert_eq!(worker.state().expect("state"), CacheState::Empty);
    let report = worker.install().await.expect("install should succeed");
    assert_eq!(report.cache, "alpha-list-cache-v1");
    assert_eq!(report.stored, manifest.len());
    assert!(report.failed.is_empty());
    assert_eq!(storage.entry_count("alpha-list-cache-v1").expect("count"), manifest.len());
    assert_eq!(
        worker.state().expect("state"),
        CacheState::Populated("alpha-list-cache-v1".to_string())
    );
}

#[tokio::test]
async fn atomic_install_writes_nothing_when_one_asset_fails() {
    let manifest = AssetManifest::standard("");
    let broken = manifest.cdn_assets[1].clone();
    let storage = Arc::new(MemoryCacheStorage::new());
    let worker = controller("v1", storage.clone(), ScriptedNetwork::serving(&manifest, &[broken.as_str()]));

    let err = worker.install().await.expect_err("install should fail");
    assert!(err.to_string().contains(&broken));
    assert_eq!(storage.entry_count("alpha-list-cache-v1").expect("count"), 0);
}

#[tokio::test]
async fn non_success_status_fails_atomic_install() {
    let manifest = AssetManifest::standard("");
    let mut responses: HashMap<String, CachedResponse> = manifest
        .urls()
        .map(|url| (url.to_string(), CachedResponse::ok(url, None, "ok")))
        .collect();
    if let Some(response) = responses.get_mut("/style.css") {
        response.status = 404;
    }
    let network = ScriptedNetwork {
        responses: Arc::new(responses),
        offline: Arc::default(),
    };
    let worker = controller("v1", Arc::new(MemoryCacheStorage::new()), network);

    match worker.install().await {
        Err(OfflineError::BadStatus { url, status }) => {
            assert_eq!(url, "/style.css");
            assert_eq!(status, 404);
        }
        other => panic!("expected bad status, got {other:?}"),
    }
}

#[tokio::test]
async fn best_effort_install_keeps_reachable_assets() {
    let manifest = AssetManifest::standard("");
    let broken = manifest.cdn_assets[0].clone();
    let storage = Arc::new(MemoryCacheStorage::new());
    let worker = controller("v1", storage.clone(), ScriptedNetwork::serving(&manifest, &[broken.as_str()]))
        .with_policy(InstallPolicy::BestEffort);

    let report = worker.install().await.expect("best effort install should succeed");
    assert_eq!(report.stored, manifest.len() - 1);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].url, broken);
    assert!(storage.lookup("alpha-list-cache-v1", &broken).expect("lookup").is_none());
}

#[tokio::test]
async fn activate_keeps_only_the_current_version() {
    let manifest = AssetManifest::standard("");
    let storage = Arc::new(MemoryCacheStorage::new());
    let network = ScriptedNetwork::serving(&manifest, &[]);

    controller("v1", storage.clone(), network.clone())
        .install()
        .await
        .expect("v1 install");
    let v2 = controller("v2", storage.clone(), network);
    v2.install().await.expect("v2 install");
    assert!(matches!(v2.state().expect("state"), CacheState::Mixed(ref names) if names.len() == 2));

    let report = v2.activate().expect("activate");
    assert_eq!(report.deleted, vec!["alpha-list-cache-v1".to_string()]);
    assert_eq!(storage.keys().expect("keys"), vec!["alpha-list-cache-v2".to_string()]);

    let again = v2.activate().expect("second activate");
    assert!(again.deleted.is_empty());
}

#[tokio::test]
async fn fetch_prefers_network_then_falls_back_to_cache() {
    let manifest = AssetManifest::standard("");
    let storage = Arc::new(MemoryCacheStorage::new());
    let network = ScriptedNetwork::serving(&manifest, &[]);
    let worker = controller("v1", storage.clone(), network.clone());

    let live = worker.fetch("/data.json").await.expect("network fetch");
    assert_eq!(live.body, b"body of /data.json");
    assert!(storage.lookup("alpha-list-cache-v1", "/data.json").expect("lookup").is_some());

    network.go_offline();
    let cached = worker.fetch("/data.json").await.expect("cached fetch");
    assert_eq!(cached, live);

    match worker.fetch("/never-seen.json").await {
        Err(OfflineError::Unavailable { url }) => assert_eq!(url, "/never-seen.json"),
        other => panic!("expected unavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn fetch_overwrites_previous_cached_copy() {
    let storage = Arc::new(MemoryCacheStorage::new());
    storage
        .put("alpha-list-cache-v1", &CachedResponse::ok("/data.json", None, "stale"))
        .expect("seed cache");
    let network = ScriptedNetwork::serving(&AssetManifest::standard(""), &[]);
    let worker = controller("v1", storage.clone(), network);

    worker.fetch("/data.json").await.expect("network fetch");
    let stored = storage
        .lookup("alpha-list-cache-v1", "/data.json")
        .expect("lookup")
        .expect("entry");
    assert_eq!(stored.body, b"body of /data.json");
}

/// Store whose writes always fail; reads see an empty store.
struct ReadOnlyStorage;

impl CacheStorage for ReadOnlyStorage {
    fn open(&self, _cache: &str) -> Result<(), OfflineError> {
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, OfflineError> {
        Ok(Vec::new())
    }

    fn delete(&self, _cache: &str) -> Result<bool, OfflineError> {
        Ok(false)
    }

    fn put(&self, _cache: &str, _response: &CachedResponse) -> Result<(), OfflineError> {
        Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only store").into())
    }

    fn lookup(&self, _cache: &str, _url: &str) -> Result<Option<CachedResponse>, OfflineError> {
        Ok(None)
    }

    fn entry_count(&self, _cache: &str) -> Result<usize, OfflineError> {
        Ok(0)
    }
}

#[tokio::test]
async fn fetch_returns_network_answer_when_cache_write_fails() {
    let network = ScriptedNetwork::serving(&AssetManifest::standard(""), &[]);
    let worker = OfflineCacheController::new("v1", AssetManifest::standard(""), ReadOnlyStorage, network);

    let live = worker.fetch("/data.json").await.expect("network answer should be returned");
    assert_eq!(live.body, b"body of /data.json");
}

#[tokio::test]
async fn fetch_survives_unwritable_disk_cache() {
    let dir = tempfile::tempdir().expect("tempdir");
    let not_a_dir = dir.path().join("cache-root");
    std::fs::write(&not_a_dir, "plain file").expect("write file");

    let network = ScriptedNetwork::serving(&AssetManifest::standard(""), &[]);
    let worker = OfflineCacheController::new(
        "v1",
        AssetManifest::standard(""),
        alphalist::offline::DiskCacheStorage::new(&not_a_dir),
        network,
    );

    let live = worker.fetch("/style.css").await.expect("network answer should be returned");
    assert_eq!(live.status, 200);
    assert_eq!(live.body, b"body of /style.css");
}
