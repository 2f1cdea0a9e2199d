use std::env;
use std::time::Duration;

/// TTLs and sizing for the security caches.
///
/// The token-version and permission TTLs only bound staleness (writes
/// evict eagerly). The blacklist carries no TTL here: its entries are
/// sized per revocation, floored at the access-token TTL taken from
/// [`JwtConfig`](crate::JwtConfig).
#[derive(Clone, Debug)]
pub struct CacheConfig {
    pub token_version_ttl: Duration,
    pub permission_ttl: Duration,
    pub memory_max_entries: usize,
    /// Optional Redis URL; when absent the in-process backend is used.
    pub redis_url: Option<String>,
}

impl CacheConfig {
    pub fn from_env() -> Self {
        Self {
            token_version_ttl: Duration::from_secs(
                env::var("CACHE_TOKEN_VERSION_TTL")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(3600), // 1 hour
            ),
            permission_ttl: Duration::from_secs(
                env::var("CACHE_PERMISSION_TTL")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(900), // 15 minutes
            ),
            memory_max_entries: env::var("CACHE_MEMORY_MAX_ENTRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10_000),
            redis_url: env::var("REDIS_URL").ok(),
        }
    }
}
