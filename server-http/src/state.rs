use cachet::{ItemOperations, ItemOperationsService, SledItemRepository};
use shared::config::Config;
use std::path::Path;
use std::sync::Arc;

/// Server state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub items: Arc<dyn ItemOperations>,
    pub cache_backend: &'static str,
}

impl AppState {
    pub fn new(service: ItemOperationsService) -> Self {
        Self {
            cache_backend: service.cache_backend(),
            items: Arc::new(service),
        }
    }

    /// Open the item database under the data directory and connect the configured cache
    pub async fn from_config(config: &Config) -> shared::Result<Self> {
        let db_path = Path::new(&config.data_dir).join("items.sled");
        let repository = Arc::new(SledItemRepository::new(&db_path)?);
        tracing::info!("Item repository opened at {}", db_path.display());

        let store = storage_engine::build_cache_store_or_fallback(config).await;

        Ok(Self::new(ItemOperationsService::from_config(
            repository, store, config,
        )))
    }
}
