use async_trait::async_trait;
use cachet::ports::CacheStore;
use moka::Expiry;
use moka::future::Cache;
use shared::{Result, TtlMs};
use std::fmt::Debug;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// A cached value together with the TTL it was written with
#[derive(Clone, Debug)]
struct Expiring<V> {
    value: V,
    ttl: Option<Duration>,
}

/// Expires each entry after its own TTL, or the cache-wide default when it has none.
/// Overwriting an entry restarts its clock with the new entry's TTL.
struct PerEntryTtl {
    default_ttl: Option<Duration>,
}

impl<K, V> Expiry<K, Expiring<V>> for PerEntryTtl {
    fn expire_after_create(&self, _key: &K, value: &Expiring<V>, _created_at: Instant) -> Option<Duration> {
        value.ttl.or(self.default_ttl)
    }

    fn expire_after_update(
        &self,
        _key: &K,
        value: &Expiring<V>,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        value.ttl.or(self.default_ttl)
    }
}

/// Moka-based cache implementation with per-entry TTL support
/// Provides lock-free, concurrent cache with optional size bounds
pub struct MokaCache<K, V>
where
    K: Debug + Hash + Eq + Send + Sync + 'static,
    V: Debug + Send + Sync + Clone + 'static,
{
    cache: Cache<K, Expiring<V>>,
    default_ttl: Option<Duration>,
}

impl<K, V> MokaCache<K, V>
where
    K: Debug + Hash + Eq + Send + Sync + 'static,
    V: Debug + Send + Sync + Clone + 'static,
{
    /// Create a Moka cache from name, optional capacity and optional default TTL
    pub fn new(name: String, max_entries: Option<u64>, default_ttl: Option<Duration>) -> Self {
        let mut builder = Cache::<K, Expiring<V>>::builder()
            .name(&name)
            .expire_after(PerEntryTtl { default_ttl });

        if let Some(capacity) = max_entries {
            builder = builder.max_capacity(capacity);
        }

        Self {
            cache: builder.build(),
            default_ttl,
        }
    }

    /// Create a new bounded Moka cache with max entries and optional default TTL
    pub fn new_bounded(max_entries: u64, default_ttl: Option<Duration>) -> Self {
        Self::new("cachet".to_string(), Some(max_entries), default_ttl)
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

#[async_trait]
impl<K, V> CacheStore<K, V> for MokaCache<K, V>
where
    K: Debug + Hash + Eq + Send + Sync + 'static,
    V: Debug + Send + Sync + Clone + 'static,
{
    async fn get(&self, key: &K) -> Result<Option<V>> {
        // Expired entries are never returned, even before they are evicted
        Ok(self.cache.get(key).await.map(|entry| entry.value))
    }

    async fn set(&self, key: K, val: V, ttl: Option<TtlMs>) -> Result<()> {
        let entry = Expiring {
            value: val,
            ttl: ttl.map(|t| t.as_duration()),
        };
        self.cache.insert(key, entry).await;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "moka"
    }
}

impl<K, V> Debug for MokaCache<K, V>
where
    K: Debug + Hash + Eq + Send + Sync + 'static,
    V: Debug + Send + Sync + Clone + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaCache")
            .field("entry_count", &self.cache.entry_count())
            .field("weighted_size", &self.cache.weighted_size())
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    #[tokio::test]
    async fn test_moka_cache_set_and_get() {
        let cache = MokaCache::new("test".to_string(), None, None);

        cache.set("hello", "world", None).await.unwrap();

        let value = cache.get(&"hello").await.unwrap();
        assert_eq!(value, Some("world"));
    }

    #[tokio::test]
    async fn test_moka_cache_get_nonexistent() {
        let cache: MokaCache<&str, &str> = MokaCache::new("test".to_string(), None, None);

        let value = cache.get(&"nonexistent").await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_moka_cache_overwrite() {
        let cache = MokaCache::new("test".to_string(), None, None);

        cache.set("key", "value1", None).await.unwrap();
        cache.set("key", "value2", None).await.unwrap();

        let value = cache.get(&"key").await.unwrap();
        assert_eq!(value, Some("value2"));
    }

    #[tokio::test]
    async fn test_moka_cache_with_per_entry_ttl() {
        let cache = MokaCache::new("test".to_string(), None, None);

        cache.set("short", "gone", Some(TtlMs(100))).await.unwrap();
        cache.set("long", "kept", Some(TtlMs(5_000))).await.unwrap();
        cache.set("forever", "kept", None).await.unwrap();

        assert_eq!(cache.get(&"short").await.unwrap(), Some("gone"));

        sleep(Duration::from_millis(150)).await;

        assert!(cache.get(&"short").await.unwrap().is_none());
        assert_eq!(cache.get(&"long").await.unwrap(), Some("kept"));
        assert_eq!(cache.get(&"forever").await.unwrap(), Some("kept"));
    }

    #[tokio::test]
    async fn test_moka_cache_with_default_ttl() {
        let cache = MokaCache::new(
            "test".to_string(),
            None,
            Some(Duration::from_millis(100)),
        );

        // No TTL on the entry, so the cache default applies
        cache.set("key", "value", None).await.unwrap();
        assert_eq!(cache.get(&"key").await.unwrap(), Some("value"));

        sleep(Duration::from_millis(150)).await;

        assert!(cache.get(&"key").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_moka_cache_overwrite_takes_new_ttl() {
        let cache = MokaCache::new("test".to_string(), None, None);

        cache.set("key", "long", Some(TtlMs(5_000))).await.unwrap();
        cache.set("key", "short", Some(TtlMs(100))).await.unwrap();

        sleep(Duration::from_millis(150)).await;

        assert!(cache.get(&"key").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_moka_cache_bounded() {
        let cache = MokaCache::new_bounded(2, None);

        cache.set("key1", "value1", None).await.unwrap();
        cache.set("key2", "value2", None).await.unwrap();
        cache.set("key3", "value3", None).await.unwrap();

        cache.cache.run_pending_tasks().await;

        assert!(cache.entry_count() <= 2, "Cache should have at most 2 entries");
    }
}
