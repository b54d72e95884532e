//! Test doubles for the two store ports.

use crate::domain::{CacheKey, Item, ItemDraft, ItemId};
use crate::persistence::SledItemRepository;
use crate::ports::{CacheStore, ItemRepository};
use async_trait::async_trait;
use bytes::Bytes;
use shared::{Error, Result, TtlMs};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// In-memory cache with per-entry expiry that records every write.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<CacheKey, (Bytes, Option<Instant>)>>,
    writes: Mutex<Vec<(CacheKey, Option<TtlMs>)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        let entries = self.entries.lock().unwrap();
        matches!(entries.get(key), Some((_, expires)) if !is_expired(*expires))
    }

    pub fn writes(&self) -> Vec<(CacheKey, Option<TtlMs>)> {
        self.writes.lock().unwrap().clone()
    }

    /// Store raw bytes, bypassing serialization
    pub fn insert_raw(&self, key: CacheKey, value: &'static [u8]) {
        self.entries
            .lock()
            .unwrap()
            .insert(key, (Bytes::from_static(value), None));
    }
}

fn is_expired(expires: Option<Instant>) -> bool {
    expires.is_some_and(|at| Instant::now() >= at)
}

#[async_trait]
impl CacheStore<CacheKey, Bytes> for MemoryCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<Bytes>> {
        let mut entries = self.entries.lock().unwrap();
        let expired = matches!(entries.get(key), Some((_, expires)) if is_expired(*expires));
        if expired {
            entries.remove(key);
            return Ok(None);
        }
        Ok(entries.get(key).map(|(value, _)| value.clone()))
    }

    async fn set(&self, key: CacheKey, val: Bytes, ttl: Option<TtlMs>) -> Result<()> {
        let expires = ttl.map(|t| Instant::now() + t.as_duration());
        self.writes.lock().unwrap().push((key.clone(), ttl));
        self.entries.lock().unwrap().insert(key, (val, expires));
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// A cache whose every call fails.
pub struct FailingCache;

#[async_trait]
impl CacheStore<CacheKey, Bytes> for FailingCache {
    async fn get(&self, _key: &CacheKey) -> Result<Option<Bytes>> {
        Err(Error::CacheUnavailable("connection refused".to_string()))
    }

    async fn set(&self, _key: CacheKey, _val: Bytes, _ttl: Option<TtlMs>) -> Result<()> {
        Err(Error::CacheUnavailable("connection refused".to_string()))
    }

    fn backend(&self) -> &'static str {
        "failing"
    }
}

/// A cache that never answers.
pub struct StalledCache;

#[async_trait]
impl CacheStore<CacheKey, Bytes> for StalledCache {
    async fn get(&self, _key: &CacheKey) -> Result<Option<Bytes>> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(None)
    }

    async fn set(&self, _key: CacheKey, _val: Bytes, _ttl: Option<TtlMs>) -> Result<()> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "stalled"
    }
}

/// Wraps a temporary sled repository and counts store hits.
pub struct CountingRepository {
    inner: SledItemRepository,
    lookup_delay: Option<Duration>,
    fail_inserts: AtomicBool,
    pub inserts: AtomicUsize,
    pub finds_by_id: AtomicUsize,
    pub finds_all: AtomicUsize,
}

impl CountingRepository {
    pub fn new() -> Self {
        Self {
            inner: SledItemRepository::temporary().unwrap(),
            lookup_delay: None,
            fail_inserts: AtomicBool::new(false),
            inserts: AtomicUsize::new(0),
            finds_by_id: AtomicUsize::new(0),
            finds_all: AtomicUsize::new(0),
        }
    }

    /// Slow down `find_by_id` so concurrent readers overlap
    pub fn with_lookup_delay(mut self, delay: Duration) -> Self {
        self.lookup_delay = Some(delay);
        self
    }

    pub fn fail_inserts(&self) {
        self.fail_inserts.store(true, Ordering::SeqCst);
    }

    pub fn store_hits(&self) -> usize {
        self.finds_by_id.load(Ordering::SeqCst) + self.finds_all.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ItemRepository for CountingRepository {
    async fn insert(&self, draft: ItemDraft) -> Result<Item> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(Error::Persistence("disk full".to_string()));
        }
        self.inner.insert(draft).await
    }

    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>> {
        self.finds_by_id.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.lookup_delay {
            tokio::time::sleep(delay).await;
        }
        self.inner.find_by_id(id).await
    }

    async fn find_all(&self) -> Result<Vec<Item>> {
        self.finds_all.fetch_add(1, Ordering::SeqCst);
        self.inner.find_all().await
    }
}
