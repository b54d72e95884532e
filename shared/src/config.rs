use tracing::warn;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheBackend {
    Moka,
    Redis,
}

impl CacheBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheBackend::Moka => "moka",
            CacheBackend::Redis => "redis",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub http_port: u16,
    pub data_dir: String,
    pub cache_backend: CacheBackend,
    pub redis_url: String,
    pub redis_prefix: String,
    pub cache_max_entries: Option<u64>,
    pub cache_default_ttl_secs: Option<u64>,
    pub write_through_ttl_secs: u64,
    pub cache_aside_ttl_secs: u64,
    pub cache_timeout_ms: u64,
    pub single_flight: bool,
}

impl Config {
    const DEFAULT_HOST: &'static str = "localhost";
    const DEFAULT_HTTP_PORT: u16 = 8080;
    const DEFAULT_DATA_DIR: &'static str = "./data";
    const DEFAULT_REDIS_URL: &'static str = "redis://127.0.0.1:6379";
    const DEFAULT_REDIS_PREFIX: &'static str = "cachet:";
    const DEFAULT_WRITE_THROUGH_TTL_SECS: u64 = 60;
    const DEFAULT_CACHE_ASIDE_TTL_SECS: u64 = 10;
    const DEFAULT_CACHE_TIMEOUT_MS: u64 = 250;

    pub fn from_env() -> Self {
        Self::from_source(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable lookup. Unparsable values fall back to defaults.
    pub fn from_source<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let cache_backend = match get("CACHET_CACHE_BACKEND").as_deref() {
            None | Some("moka") => CacheBackend::Moka,
            Some("redis") => CacheBackend::Redis,
            Some(other) => {
                warn!("Unknown CACHET_CACHE_BACKEND '{}', using moka", other);
                CacheBackend::Moka
            }
        };

        Self {
            host: get("CACHET_HOST").unwrap_or_else(|| Self::DEFAULT_HOST.to_string()),
            http_port: parse_or(&get, "CACHET_HTTP_PORT", Self::DEFAULT_HTTP_PORT),
            data_dir: get("CACHET_DATA_DIR").unwrap_or_else(|| Self::DEFAULT_DATA_DIR.to_string()),
            cache_backend,
            redis_url: get("CACHET_REDIS_URL")
                .unwrap_or_else(|| Self::DEFAULT_REDIS_URL.to_string()),
            redis_prefix: get("CACHET_REDIS_PREFIX")
                .unwrap_or_else(|| Self::DEFAULT_REDIS_PREFIX.to_string()),
            cache_max_entries: parse_opt(&get, "CACHET_CACHE_MAX_ENTRIES"),
            cache_default_ttl_secs: ttl_secs(&get, "CACHET_CACHE_DEFAULT_TTL_SECS"),
            write_through_ttl_secs: ttl_secs(&get, "CACHET_WRITE_THROUGH_TTL_SECS")
                .unwrap_or(Self::DEFAULT_WRITE_THROUGH_TTL_SECS),
            cache_aside_ttl_secs: ttl_secs(&get, "CACHET_CACHE_ASIDE_TTL_SECS")
                .unwrap_or(Self::DEFAULT_CACHE_ASIDE_TTL_SECS),
            cache_timeout_ms: parse_or(
                &get,
                "CACHET_CACHE_TIMEOUT_MS",
                Self::DEFAULT_CACHE_TIMEOUT_MS,
            ),
            single_flight: parse_or(&get, "CACHET_SINGLE_FLIGHT", true),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_source(|_| None)
    }
}

/// Longest TTL, in seconds, that still fits in milliseconds.
pub const MAX_TTL_SECS: u64 = u64::MAX / 1000;

fn parse_opt<F, T>(get: &F, name: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let raw = get(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Invalid value '{}' for {}, using default", raw, name);
            None
        }
    }
}

fn parse_or<F, T>(get: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    parse_opt(get, name).unwrap_or(default)
}

fn ttl_secs<F>(get: &F, name: &str) -> Option<u64>
where
    F: Fn(&str) -> Option<String>,
{
    let secs = parse_opt(get, name)?;
    if secs > MAX_TTL_SECS {
        warn!("{}s for {} exceeds {}s, using default", secs, name, MAX_TTL_SECS);
        return None;
    }
    Some(secs)
}
