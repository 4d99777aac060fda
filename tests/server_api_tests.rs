use std::path::{Path, PathBuf};
use std::sync::Arc;

use alphalist::catalog::{parse_dataset, Catalog};
use alphalist::server::{build_router, AppState};
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

const DATASET: &str = r#"{
    "Kanto": {
        "Route 1": [
            {"data": {"Name": "Rattata", "Full Location": "Route 1\nGrass", "Map Link": "https://maps/r1.png", "Moveset": "- Tackle"}},
            {"data": {"Name": "Pidgey", "Full Location": "Route 1", "Moveset": "- Gust"}}
        ]
    },
    "Johto": {
        "Route 1": [{"data": {"Name": "Sentret", "Full Location": "Route 1"}}]
    }
}"#;

fn fixture_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("data.json"), DATASET).expect("write dataset");
    std::fs::create_dir_all(dir.path().join("site")).expect("site dir");
    std::fs::write(dir.path().join("site/index.html"), "<h1>Alpha List</h1>").expect("write index");
    dir
}

fn router_for(dir: &Path, state: AppState) -> Router {
    build_router(state, &dir.join("site"), &dir.join("data.json"))
}

fn ready_router(dir: &Path) -> Router {
    let catalog = Catalog::from_dataset(parse_dataset(DATASET).expect("dataset should parse"));
    router_for(dir, AppState::Ready(Arc::new(catalog)))
}

async fn get(router: Router, uri: &str) -> (StatusCode, String) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
        .await
        .expect("router should respond");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

fn json(body: &str) -> serde_json::Value {
    serde_json::from_str(body).expect("response should be valid json")
}

#[tokio::test]
async fn health_reports_catalog_state() {
    let dir = fixture_dir();
    let (status, body) = get(ready_router(dir.path()), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    let payload = json(&body);
    assert_eq!(payload["status"], "ok");
    assert_eq!(payload["catalog"], "ready");
    assert_eq!(payload["records"], 3);
}

#[tokio::test]
async fn catalog_groups_by_name_with_composite_titles() {
    let dir = fixture_dir();
    let (status, body) = get(ready_router(dir.path()), "/api/catalog?group=name").await;
    assert_eq!(status, StatusCode::OK);

    let payload = json(&body);
    assert_eq!(payload["status"], "groups");
    assert_eq!(payload["mode"], "by_name");
    assert_eq!(payload["total"], 3);
    let titles: Vec<_> = payload["groups"]
        .as_array()
        .expect("groups should be an array")
        .iter()
        .map(|g| g["title"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(titles, vec!["Pidgey (1)", "Rattata (1)", "Sentret (1)"]);
    assert_eq!(payload["groups"][1]["records"][0]["title"], "Kanto - Route 1");
    assert_eq!(payload["groups"][1]["records"][0]["location"]["kind"], "with_map");
}

#[tokio::test]
async fn catalog_applies_bracketed_location_filter() {
    let dir = fixture_dir();
    let (status, body) = get(
        ready_router(dir.path()),
        "/api/catalog?region=all&location=%5Bj%5D%20route&group=location",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let payload = json(&body);
    assert_eq!(payload["total"], 1);
    assert_eq!(payload["groups"][0]["key"], "Johto - Route 1");
}

#[tokio::test]
async fn catalog_reports_empty_state() {
    let dir = fixture_dir();
    let (status, body) = get(ready_router(dir.path()), "/api/catalog?search=mewtwo").await;
    assert_eq!(status, StatusCode::OK);
    let payload = json(&body);
    assert_eq!(payload["status"], "empty");
    assert!(payload["message"].as_str().is_some());
}

#[tokio::test]
async fn catalog_rejects_unknown_grouping() {
    let dir = fixture_dir();
    let (status, body) = get(ready_router(dir.path()), "/api/catalog?group=region").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("unknown grouping"));
}

#[tokio::test]
async fn locations_for_all_regions_are_tagged() {
    let dir = fixture_dir();
    let (status, body) = get(ready_router(dir.path()), "/api/locations?region=all").await;
    assert_eq!(status, StatusCode::OK);
    let payload = json(&body);
    let labels: Vec<_> = payload["locations"]
        .as_array()
        .expect("locations should be an array")
        .iter()
        .map(|o| o["label"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(labels, vec!["[K] Route 1", "[J] Route 1"]);
}

#[tokio::test]
async fn export_returns_markdown_or_not_found() {
    let dir = fixture_dir();
    let (status, body) = get(
        ready_router(dir.path()),
        "/api/export?region=Kanto&location=Route%201&name=Rattata",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.starts_with("**Rattata**\n_Route 1_\n_[Grass](https://maps/r1.png) _\n"));
    assert!(body.contains("Despawns approximately <t:"));

    let (status, _) = get(
        ready_router(dir.path()),
        "/api/export?region=Kanto&location=Route%201&name=Mew",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unavailable_catalog_answers_503() {
    let dir = fixture_dir();
    let router = router_for(dir.path(), AppState::Unavailable(Arc::from("dataset missing")));
    let (status, body) = get(router.clone(), "/api/regions").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body.contains("dataset missing"));

    let (status, body) = get(router, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["catalog"], "unavailable");
}

#[tokio::test]
async fn dataset_and_site_files_are_served() {
    let dir = fixture_dir();
    let (status, body) = get(ready_router(dir.path()), "/data.json?v=1700000000000").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json(&body).get("Kanto").is_some());

    let (status, body) = get(ready_router(dir.path()), "/index.html").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Alpha List"));

    let (status, _) = get(ready_router(dir.path()), "/missing.css").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[test]
fn load_state_reports_missing_dataset() {
    let config = alphalist::config::AppConfig {
        data_path: PathBuf::from("definitely/missing/data.json"),
        ..alphalist::config::AppConfig::default()
    };
    match alphalist::server::load_state(&config) {
        AppState::Unavailable(message) => assert!(message.contains("definitely/missing")),
        AppState::Ready(_) => panic!("missing dataset should not load"),
    }
}
