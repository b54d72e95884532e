use crate::domain::{ItemDraft, ItemDto, ItemId};
use async_trait::async_trait;
use shared::Result;

/// Caller-facing item operations.
/// Each one applies its own caching policy in front of the item repository.
#[async_trait]
pub trait ItemOperations: Send + Sync + 'static {
    /// Persist, then write the result through to the cache before returning it.
    async fn create(&self, draft: ItemDraft) -> Result<ItemDto>;

    /// Read-through over the full list snapshot.
    async fn read_all(&self) -> Result<Vec<ItemDto>>;

    /// Read-through by id, cached with the store's default expiry.
    async fn read_one(&self, id: ItemId) -> Result<ItemDto>;

    /// Cache-aside by id, cached with its own short TTL.
    async fn read_one_manual(&self, id: ItemId) -> Result<ItemDto>;
}
