use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::AppConfig;

pub mod api;
pub mod routes;

pub use routes::{build_router, AppState};

/// Load the catalog once; a load failure is logged and reported through the API rather than
/// stopping the server.
pub fn load_state(config: &AppConfig) -> AppState {
    match Catalog::load(&config.data_path) {
        Ok(catalog) => AppState::Ready(catalog),
        Err(err) => {
            tracing::error!(error = %err, "catalog failed to load");
            AppState::Unavailable(Arc::from(err.to_string()))
        }
    }
}

pub async fn serve(config: AppConfig) -> std::io::Result<()> {
    let state = load_state(&config);
    let app = build_router(state, &config.site_dir, &config.data_path);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, site = %config.site_dir.display(), "alphalist server listening");
    axum::serve(listener, app).await
}

pub fn run_server(config: AppConfig) -> std::io::Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(serve(config))
}
