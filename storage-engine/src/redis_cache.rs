use async_trait::async_trait;
use bytes::Bytes;
use cachet::domain::CacheKey;
use cachet::ports::CacheStore;
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;
use shared::{Error, Result, TtlMs};
use std::time::Duration;

/// Redis-backed cache store.
///
/// Keys are rendered as `{prefix}{namespace}::{id}`. TTLs are sent with `SET ... EX`,
/// which has second granularity, so sub-second TTLs round up to one second.
#[derive(Clone)]
pub struct RedisCache {
    connection: MultiplexedConnection,
    prefix: String,
}

impl RedisCache {
    /// Connect to `addr`, namespacing every key under `prefix`.
    /// `response_timeout` bounds every command; `None` waits indefinitely.
    pub async fn connect(
        addr: &str,
        prefix: impl Into<String>,
        response_timeout: Option<Duration>,
    ) -> Result<Self> {
        let client = redis::Client::open(addr).map_err(unavailable)?;

        let mut config = redis::AsyncConnectionConfig::new();
        if let Some(timeout) = response_timeout {
            config = config.set_response_timeout(timeout);
        }

        let connection = client
            .get_multiplexed_async_connection_with_config(&config)
            .await
            .map_err(unavailable)?;

        Ok(Self {
            connection,
            prefix: prefix.into(),
        })
    }

    fn redis_key(&self, key: &CacheKey) -> String {
        render_key(&self.prefix, key)
    }
}

fn render_key(prefix: &str, key: &CacheKey) -> String {
    format!("{}{}", prefix, key)
}

fn unavailable(err: redis::RedisError) -> Error {
    Error::CacheUnavailable(format!("redis: {}", err))
}

#[async_trait]
impl CacheStore<CacheKey, Bytes> for RedisCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<Bytes>> {
        let mut conn = self.connection.clone();
        let value: Option<Vec<u8>> = conn.get(self.redis_key(key)).await.map_err(unavailable)?;
        Ok(value.map(Bytes::from))
    }

    async fn set(&self, key: CacheKey, val: Bytes, ttl: Option<TtlMs>) -> Result<()> {
        let mut conn = self.connection.clone();
        let redis_key = self.redis_key(&key);

        match ttl {
            Some(ttl) => conn
                .set_ex::<_, _, ()>(redis_key, val.as_ref(), ttl.as_secs_ceil())
                .await
                .map_err(unavailable),
            None => conn
                .set::<_, _, ()>(redis_key, val.as_ref())
                .await
                .map_err(unavailable),
        }
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}

impl std::fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCache")
            .field("prefix", &self.prefix)
            .finish()
    }
}
