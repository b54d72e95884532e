use crate::consistency::{CacheLayer, SharedCacheStore};
use crate::domain::{CacheKey, ItemDraft, ItemDto, ItemId};
use crate::operations::operation::ItemOperations;
use crate::policy::{CachePolicies, CachePolicy};
use crate::ports::ItemRepository;
use async_trait::async_trait;
use shared::config::Config;
use shared::{Error, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Application service that orchestrates item reads and writes across the
/// repository and the cache.
/// This is the main entry point for all item operations in the application core
#[derive(Clone)]
pub struct ItemOperationsService {
    repository: Arc<dyn ItemRepository>,
    cache: Arc<CacheLayer>,
    policies: CachePolicies,
}

impl ItemOperationsService {
    pub fn new(repository: Arc<dyn ItemRepository>, cache: CacheLayer, policies: CachePolicies) -> Self {
        Self {
            repository,
            cache: Arc::new(cache),
            policies,
        }
    }

    pub fn from_config(
        repository: Arc<dyn ItemRepository>,
        store: SharedCacheStore,
        config: &Config,
    ) -> Self {
        let cache = CacheLayer::new(store)
            .with_timeout(Duration::from_millis(config.cache_timeout_ms))
            .with_single_flight(config.single_flight);

        Self::new(repository, cache, CachePolicies::from_config(config))
    }

    pub fn cache_backend(&self) -> &'static str {
        self.cache.store().backend()
    }

    async fn read_item(&self, policy: &CachePolicy, id: ItemId) -> Result<ItemDto> {
        self.cache
            .fetch(policy, CacheKey::item(id), || async move {
                let item = self.repository.find_by_id(id).await?;
                item.map(ItemDto::from).ok_or(Error::NotFound)
            })
            .await
    }
}

#[async_trait]
impl ItemOperations for ItemOperationsService {
    async fn create(&self, draft: ItemDraft) -> Result<ItemDto> {
        let item = self.repository.insert(draft).await?;
        let dto = ItemDto::from(item);

        self.cache
            .populate(&self.policies.write_through, CacheKey::item(dto.id), &dto)
            .await;

        info!("Created item {}", dto.id);
        Ok(dto)
    }

    async fn read_all(&self) -> Result<Vec<ItemDto>> {
        self.cache
            .fetch(&self.policies.read_through_list, CacheKey::item_list(), || async move {
                let items = self.repository.find_all().await?;
                Ok::<_, Error>(items.into_iter().map(ItemDto::from).collect::<Vec<_>>())
            })
            .await
    }

    async fn read_one(&self, id: ItemId) -> Result<ItemDto> {
        self.read_item(&self.policies.read_through_item, id).await
    }

    async fn read_one_manual(&self, id: ItemId) -> Result<ItemDto> {
        self.read_item(&self.policies.cache_aside, id).await
    }
}

impl std::fmt::Debug for ItemOperationsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemOperationsService")
            .field("cache", &self.cache)
            .field("policies", &self.policies)
            .finish()
    }
}
