// shared/src/lib.rs

use std::time::Duration;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("not found")]
    NotFound,
    #[error("persistence: {0}")]
    Persistence(String),
    #[error("cache unavailable: {0}")]
    CacheUnavailable(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Time-to-live attached to a cache entry, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TtlMs(pub u64);

impl TtlMs {
    /// Saturates at `u64::MAX` milliseconds.
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs.saturating_mul(1000))
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_millis(self.0)
    }

    /// Whole seconds, rounded up. Backends with second granularity use this.
    pub fn as_secs_ceil(&self) -> u64 {
        self.0.div_ceil(1000).max(1)
    }
}

pub mod config;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_rounds_up_to_whole_seconds() {
        assert_eq!(TtlMs::from_secs(60).as_secs_ceil(), 60);
        assert_eq!(TtlMs(1).as_secs_ceil(), 1);
        assert_eq!(TtlMs(1500).as_secs_ceil(), 2);
        assert_eq!(TtlMs(0).as_secs_ceil(), 1);
    }

    #[test]
    fn ttl_converts_to_duration() {
        assert_eq!(TtlMs::from_secs(10).as_duration(), Duration::from_secs(10));
    }

    #[test]
    fn ttl_from_huge_secs_saturates() {
        assert_eq!(TtlMs::from_secs(u64::MAX / 1000 + 1), TtlMs(u64::MAX));
    }
}
