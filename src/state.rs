use crate::config::settings::AppConfig;
use crate::modules::catalog::provider::CatalogProvider;
use crate::modules::session::registry::SessionRegistry;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub catalog: Arc<dyn CatalogProvider>,
    pub sessions: SessionRegistry,
}

impl AppState {
    pub fn new(config: AppConfig, catalog: Arc<dyn CatalogProvider>) -> Self {
        Self {
            config,
            catalog,
            sessions: SessionRegistry::new(),
        }
    }
}
