use crate::domain::Namespace;
use shared::TtlMs;
use shared::config::Config;

/// How long an entry written under a policy lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expiry {
    Fixed(TtlMs),
    /// No explicit TTL; the cache store's own default applies.
    StoreDefault,
}

impl Expiry {
    pub fn ttl(&self) -> Option<TtlMs> {
        match self {
            Expiry::Fixed(ttl) => Some(*ttl),
            Expiry::StoreDefault => None,
        }
    }
}

/// What causes an entry to be written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    OnWrite,
    OnReadMiss,
}

/// Caching rules for one call site: key space, expiry and population trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CachePolicy {
    pub name: &'static str,
    pub namespace: Namespace,
    pub expiry: Expiry,
    pub trigger: Trigger,
}

impl CachePolicy {
    pub const fn write_through(ttl: TtlMs) -> Self {
        Self {
            name: "write-through",
            namespace: Namespace::Item,
            expiry: Expiry::Fixed(ttl),
            trigger: Trigger::OnWrite,
        }
    }

    pub const fn read_through(namespace: Namespace) -> Self {
        Self {
            name: "read-through",
            namespace,
            expiry: Expiry::StoreDefault,
            trigger: Trigger::OnReadMiss,
        }
    }

    pub const fn cache_aside(ttl: TtlMs) -> Self {
        Self {
            name: "cache-aside",
            namespace: Namespace::Item,
            expiry: Expiry::Fixed(ttl),
            trigger: Trigger::OnReadMiss,
        }
    }

    pub fn ttl(&self) -> Option<TtlMs> {
        self.expiry.ttl()
    }
}

/// The policies used by each item operation.
///
/// All single-item policies share `Namespace::Item`, so whichever one writes a
/// key last decides that entry's expiry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CachePolicies {
    /// `create`
    pub write_through: CachePolicy,
    /// `read_all`
    pub read_through_list: CachePolicy,
    /// `read_one`
    pub read_through_item: CachePolicy,
    /// `read_one_manual`
    pub cache_aside: CachePolicy,
}

impl CachePolicies {
    pub const DEFAULT_WRITE_THROUGH_TTL: TtlMs = TtlMs::from_secs(60);
    pub const DEFAULT_CACHE_ASIDE_TTL: TtlMs = TtlMs::from_secs(10);

    pub fn new(write_through_ttl: TtlMs, cache_aside_ttl: TtlMs) -> Self {
        Self {
            write_through: CachePolicy::write_through(write_through_ttl),
            read_through_list: CachePolicy::read_through(Namespace::ItemList),
            read_through_item: CachePolicy::read_through(Namespace::Item),
            cache_aside: CachePolicy::cache_aside(cache_aside_ttl),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            TtlMs::from_secs(config.write_through_ttl_secs),
            TtlMs::from_secs(config.cache_aside_ttl_secs),
        )
    }
}

impl Default for CachePolicies {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WRITE_THROUGH_TTL, Self::DEFAULT_CACHE_ASIDE_TTL)
    }
}
