use std::path::Path;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::catalog::Catalog;
use crate::server::api::{self, ApiError, CatalogQuery, ExportQuery, LocationsQuery};

/// Whether the dataset loaded. An unavailable catalog keeps the server up and answers API
/// requests with 503 and the load error.
#[derive(Debug, Clone)]
pub enum AppState {
    Ready(Arc<Catalog>),
    Unavailable(Arc<str>),
}

impl AppState {
    fn catalog(&self) -> Result<&Catalog, Response> {
        match self {
            AppState::Ready(catalog) => Ok(catalog.as_ref()),
            AppState::Unavailable(message) => Err(error_response(
                StatusCode::SERVICE_UNAVAILABLE,
                &format!("Catalog unavailable: {message}"),
            )),
        }
    }
}

pub fn build_router(state: AppState, site_dir: &Path, data_path: &Path) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/regions", get(regions))
        .route("/api/locations", get(locations))
        .route("/api/catalog", get(render_catalog))
        .route("/api/export", get(export))
        .route_service("/data.json", ServeFile::new(data_path))
        .fallback_service(ServeDir::new(site_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Response {
    let catalog = match &state {
        AppState::Ready(catalog) => Some(catalog.as_ref()),
        AppState::Unavailable(_) => None,
    };
    serialized(api::health_payload(catalog))
}

async fn regions(State(state): State<AppState>) -> Response {
    match state.catalog() {
        Ok(catalog) => serialized(api::regions_payload(catalog)),
        Err(response) => response,
    }
}

async fn locations(State(state): State<AppState>, Query(query): Query<LocationsQuery>) -> Response {
    match state.catalog() {
        Ok(catalog) => serialized(api::locations_payload(catalog, &query)),
        Err(response) => response,
    }
}

async fn render_catalog(State(state): State<AppState>, Query(query): Query<CatalogQuery>) -> Response {
    let catalog = match state.catalog() {
        Ok(catalog) => catalog,
        Err(response) => return response,
    };
    match api::catalog_payload(catalog, &query) {
        Ok(payload) => json_response(StatusCode::OK, payload),
        Err(err) => api_error_response(err),
    }
}

async fn export(State(state): State<AppState>, Query(query): Query<ExportQuery>) -> Response {
    let catalog = match state.catalog() {
        Ok(catalog) => catalog,
        Err(response) => return response,
    };
    match api::export_text(catalog, &query, chrono::Utc::now()) {
        Ok(text) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
            text,
        )
            .into_response(),
        Err(err) => api_error_response(err),
    }
}

fn serialized(payload: Result<String, serde_json::Error>) -> Response {
    match payload {
        Ok(body) => json_response(StatusCode::OK, body),
        Err(err) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string()),
    }
}

fn api_error_response(err: ApiError) -> Response {
    let status = match &err {
        ApiError::InvalidGroupMode(_) => StatusCode::BAD_REQUEST,
        ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
        ApiError::Serialize(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, &err.to_string())
}

fn json_response(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

fn error_response(status: StatusCode, message: &str) -> Response {
    let body = format!(
        "{{\n  \"status\": \"error\",\n  \"message\": {}\n}}",
        serde_json::to_string(message).unwrap_or_else(|_| "\"Unknown error\"".to_string())
    );
    json_response(status, body)
}
