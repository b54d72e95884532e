use crate::domain::CacheKey;
use crate::policy::{CachePolicy, Trigger};
use crate::ports::CacheStore;
use crate::single_flight::SingleFlight;
use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::{Error, Result};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub type SharedCacheStore = Arc<dyn CacheStore<CacheKey, Bytes>>;

/// Applies a `CachePolicy` around a backing-store load.
///
/// Cache failures and timeouts never reach the caller: a failed lookup is a miss
/// and a failed write leaves the value uncached. Load failures are returned as-is
/// and are never cached.
pub struct CacheLayer {
    store: SharedCacheStore,
    op_timeout: Duration,
    flights: Option<SingleFlight>,
}

impl CacheLayer {
    pub const DEFAULT_OP_TIMEOUT: Duration = Duration::from_millis(250);

    pub fn new(store: SharedCacheStore) -> Self {
        Self {
            store,
            op_timeout: Self::DEFAULT_OP_TIMEOUT,
            flights: Some(SingleFlight::new()),
        }
    }

    pub fn with_timeout(mut self, op_timeout: Duration) -> Self {
        self.op_timeout = op_timeout;
        self
    }

    pub fn with_single_flight(mut self, enabled: bool) -> Self {
        self.flights = enabled.then(SingleFlight::new);
        self
    }

    pub fn store(&self) -> &SharedCacheStore {
        &self.store
    }

    /// get, then on miss load and set under `policy`. Only for `OnReadMiss` policies.
    pub async fn fetch<T, F, Fut>(&self, policy: &CachePolicy, key: CacheKey, load: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T>> + Send,
    {
        debug_assert_eq!(
            policy.trigger,
            Trigger::OnReadMiss,
            "fetch called with {} policy",
            policy.name
        );

        if let Some(hit) = self.lookup(policy, &key).await {
            return Ok(hit);
        }

        let _flight = match &self.flights {
            Some(flights) => {
                let flight = flights.acquire(&key).await;
                // Whoever held the flight before us may have filled the key
                if let Some(hit) = self.lookup(policy, &key).await {
                    return Ok(hit);
                }
                Some(flight)
            }
            None => None,
        };

        let value = load().await?;
        self.store_value(policy, key, &value).await;
        Ok(value)
    }

    /// Best-effort set of a freshly written value. Only for `OnWrite` policies.
    pub async fn populate<T>(&self, policy: &CachePolicy, key: CacheKey, value: &T)
    where
        T: Serialize + Sync,
    {
        debug_assert_eq!(
            policy.trigger,
            Trigger::OnWrite,
            "populate called with {} policy",
            policy.name
        );
        self.store_value(policy, key, value).await;
    }

    async fn store_value<T>(&self, policy: &CachePolicy, key: CacheKey, value: &T)
    where
        T: Serialize + Sync,
    {
        let bytes = match serde_json::to_vec(value) {
            Ok(bytes) => Bytes::from(bytes),
            Err(e) => {
                warn!("Failed to encode value for key '{}' ({}): {}", key, policy.name, e);
                return;
            }
        };

        let ttl = policy.ttl();
        let key_label = key.to_string();
        match self.bounded(self.store.set(key, bytes, ttl)).await {
            Ok(()) => debug!(
                "Cached key '{}' ({}, ttl_ms={:?})",
                key_label,
                policy.name,
                ttl.map(|t| t.0)
            ),
            Err(e) => warn!(
                "Cache write for key '{}' ({}) skipped: {}",
                key_label, policy.name, e
            ),
        }
    }

    async fn lookup<T>(&self, policy: &CachePolicy, key: &CacheKey) -> Option<T>
    where
        T: DeserializeOwned,
    {
        match self.bounded(self.store.get(key)).await {
            Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
                Ok(value) => {
                    debug!("Cache hit for key '{}' ({})", key, policy.name);
                    Some(value)
                }
                Err(e) => {
                    warn!(
                        "Undecodable cache entry for key '{}' ({}), treating as miss: {}",
                        key, policy.name, e
                    );
                    None
                }
            },
            Ok(None) => {
                debug!("Cache miss for key '{}' ({})", key, policy.name);
                None
            }
            Err(e) => {
                warn!(
                    "Cache read for key '{}' ({}) failed, falling back to store: {}",
                    key, policy.name, e
                );
                None
            }
        }
    }

    async fn bounded<T>(&self, op: impl Future<Output = Result<T>>) -> Result<T> {
        match tokio::time::timeout(self.op_timeout, op).await {
            Ok(result) => result,
            Err(_) => Err(Error::CacheUnavailable(format!(
                "{} did not respond within {:?}",
                self.store.backend(),
                self.op_timeout
            ))),
        }
    }
}

impl std::fmt::Debug for CacheLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheLayer")
            .field("backend", &self.store.backend())
            .field("op_timeout", &self.op_timeout)
            .field("single_flight", &self.flights.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::CachePolicies;
    use crate::testing::MemoryCache;

    fn layer() -> (CacheLayer, Arc<MemoryCache>) {
        let cache = Arc::new(MemoryCache::new());
        (CacheLayer::new(cache.clone()), cache)
    }

    #[tokio::test]
    async fn test_populate_writes_with_policy_ttl() {
        let (layer, cache) = layer();
        let policies = CachePolicies::default();

        layer
            .populate(&policies.write_through, CacheKey::item(1), &"pen")
            .await;

        assert_eq!(
            cache.writes(),
            vec![(CacheKey::item(1), policies.write_through.ttl())]
        );
    }

    #[tokio::test]
    async fn test_fetch_fills_on_miss_only() {
        let (layer, cache) = layer();
        let policy = CachePolicies::default().cache_aside;

        let first: String = layer
            .fetch(&policy, CacheKey::item(1), || async { Ok("pen".to_string()) })
            .await
            .unwrap();
        let second: String = layer
            .fetch(&policy, CacheKey::item(1), || async { Ok("ink".to_string()) })
            .await
            .unwrap();

        assert_eq!(first, "pen");
        assert_eq!(second, "pen");
        assert_eq!(cache.writes().len(), 1);
    }

    #[cfg(debug_assertions)]
    #[tokio::test]
    #[should_panic(expected = "fetch called with write-through policy")]
    async fn test_fetch_rejects_write_policy() {
        let (layer, _) = layer();
        let policy = CachePolicies::default().write_through;

        let _: Result<String> = layer
            .fetch(&policy, CacheKey::item(1), || async { Ok("pen".to_string()) })
            .await;
    }

    #[cfg(debug_assertions)]
    #[tokio::test]
    #[should_panic(expected = "populate called with cache-aside policy")]
    async fn test_populate_rejects_read_policy() {
        let (layer, _) = layer();
        let policy = CachePolicies::default().cache_aside;

        layer.populate(&policy, CacheKey::item(1), &"pen").await;
    }
}
