use crate::domain::CacheKey;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Per-key miss coalescing.
///
/// A caller that misses the cache takes the key's flight before loading. Callers
/// that miss the same key meanwhile queue on the same flight and, once they get
/// it, find the value the first caller cached.
#[derive(Default)]
pub struct SingleFlight {
    locks: DashMap<CacheKey, Arc<Mutex<()>>>,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive ownership of `key`'s flight
    pub async fn acquire(&self, key: &CacheKey) -> Flight<'_> {
        let lock = self.locks.entry(key.clone()).or_default().value().clone();
        let guard = lock.lock_owned().await;

        Flight {
            locks: &self.locks,
            key: key.clone(),
            guard: Some(guard),
        }
    }

    /// Number of keys with a flight in progress or queued
    pub fn in_flight(&self) -> usize {
        self.locks.len()
    }
}

/// Held while loading a key. Releasing the last reference drops the key's lock entry.
pub struct Flight<'a> {
    locks: &'a DashMap<CacheKey, Arc<Mutex<()>>>,
    key: CacheKey,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for Flight<'_> {
    fn drop(&mut self) {
        self.guard.take();
        self.locks
            .remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}

impl std::fmt::Debug for SingleFlight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SingleFlight")
            .field("in_flight", &self.locks.len())
            .finish()
    }
}
