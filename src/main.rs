use anyhow::Context;
use dotenvy::dotenv;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::settings::{AppConfig, CatalogBackend};
use crate::infrastructure::gemini::client::GeminiClient;
use crate::modules::catalog::fixture::StaticCatalog;
use crate::modules::catalog::provider::CatalogProvider;
use crate::modules::catalog::repository::GeminiCatalog;
use crate::state::AppState;

mod app;
mod common;
mod config;
mod docs;
mod infrastructure;
mod modules;
mod routes;
mod state;
mod workers;

async fn build_catalog(backend: &CatalogBackend) -> anyhow::Result<Arc<dyn CatalogProvider>> {
    let catalog: Arc<dyn CatalogProvider> = match backend {
        CatalogBackend::Gemini {
            api_key,
            model,
            base_url,
            timeout,
        } => {
            let client = GeminiClient::new(api_key, model, base_url, *timeout)
                .context("Failed to build Gemini client")?;
            Arc::new(GeminiCatalog::new(client))
        }
        CatalogBackend::Static { fixture_path } => Arc::new(
            StaticCatalog::load(fixture_path)
                .await
                .with_context(|| format!("Failed to load {}", fixture_path.display()))?,
        ),
    };
    Ok(catalog)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting server...");

    let config = AppConfig::new().context("Invalid configuration")?;
    let catalog = build_catalog(&config.catalog).await?;
    let port = config.server_port;
    let state = AppState::new(config, catalog);

    tokio::spawn(workers::session_reaper::start_session_reaper(state.clone()));

    let app = app::create_app(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind port {port}"))?;
    info!("Server running on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}
