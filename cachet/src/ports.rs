#![deny(clippy::all)]

use crate::domain::{Item, ItemDraft, ItemId};
use async_trait::async_trait;
use shared::{Result, TtlMs};

// Ports are the pluggable extension points for the two external stores

/// Port for the persistent record store
#[async_trait]
pub trait ItemRepository: Send + Sync + 'static {
    /// Store a draft and return it with its assigned id
    async fn insert(&self, draft: ItemDraft) -> Result<Item>;

    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>>;

    /// All items, ordered by id
    async fn find_all(&self) -> Result<Vec<Item>>;
}

/// Port for key/value cache backends with per-entry expiry (e.g., Moka, Redis)
#[async_trait]
pub trait CacheStore<K, V>: Send + Sync + 'static {
    /// `Ok(None)` is a miss; `Err` means the backend itself failed.
    async fn get(&self, key: &K) -> Result<Option<V>>;

    /// `ttl: None` leaves expiry to the backend's own default.
    async fn set(&self, key: K, val: V, ttl: Option<TtlMs>) -> Result<()>;

    /// Short backend name for logs and health output
    fn backend(&self) -> &'static str;
}
