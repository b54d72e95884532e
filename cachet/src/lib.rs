pub mod consistency;
pub mod domain;
pub mod operations;
pub mod persistence;
pub mod policy;
pub mod ports;
pub mod single_flight;

#[cfg(test)]
pub(crate) mod testing;

pub use consistency::{CacheLayer, SharedCacheStore};
pub use domain::{CacheKey, Item, ItemDraft, ItemDto, ItemId, Namespace};
pub use operations::{ItemOperations, ItemOperationsService};
pub use persistence::SledItemRepository;
pub use policy::{CachePolicies, CachePolicy, Expiry, Trigger};
pub use ports::{CacheStore, ItemRepository};
