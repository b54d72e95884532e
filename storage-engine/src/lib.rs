pub mod moka_cache;
pub mod redis_cache;

pub use moka_cache::MokaCache;
pub use redis_cache::RedisCache;

use bytes::Bytes;
use cachet::domain::CacheKey;
use cachet::SharedCacheStore;
use shared::Result;
use shared::config::{CacheBackend, Config};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Build the in-process cache described by `config`.
pub fn moka_store(config: &Config) -> SharedCacheStore {
    let default_ttl = config.cache_default_ttl_secs.map(Duration::from_secs);
    Arc::new(MokaCache::<CacheKey, Bytes>::new(
        "cachet-items".to_string(),
        config.cache_max_entries,
        default_ttl,
    ))
}

/// Build the configured cache backend.
pub async fn build_cache_store(config: &Config) -> Result<SharedCacheStore> {
    match config.cache_backend {
        CacheBackend::Moka => {
            info!(
                "Using moka cache (max_entries={:?}, default_ttl_secs={:?})",
                config.cache_max_entries, config.cache_default_ttl_secs
            );
            Ok(moka_store(config))
        }
        CacheBackend::Redis => {
            if config.cache_default_ttl_secs.is_some() {
                warn!("CACHET_CACHE_DEFAULT_TTL_SECS is ignored by the redis backend; use the server's eviction policy");
            }
            let timeout = Duration::from_millis(config.cache_timeout_ms);
            let cache =
                RedisCache::connect(&config.redis_url, config.redis_prefix.as_str(), Some(timeout))
                    .await?;
            info!(
                "Using redis cache at {} (prefix '{}')",
                config.redis_url, config.redis_prefix
            );
            Ok(Arc::new(cache))
        }
    }
}

/// Like `build_cache_store`, but falls back to moka when the configured backend is unreachable.
pub async fn build_cache_store_or_fallback(config: &Config) -> SharedCacheStore {
    match build_cache_store(config).await {
        Ok(store) => store,
        Err(e) => {
            warn!(
                "Failed to initialize {} cache: {}. Running with in-process cache.",
                config.cache_backend.as_str(),
                e
            );
            moka_store(config)
        }
    }
}
