//! # Deliver Cache
//!
//! Cache abstraction for the security caches (token versions, the sid
//! blacklist, permission snapshots).
//!
//! All lifecycle (backend choice, TTLs, capacity) is configuration
//! passed at construction; nothing here is ambient state. Two backends
//! implement the same [`Cache`] trait:
//!
//! - [`MemoryCache`]: in-process, per-entry TTL, bounded size
//! - [`RedisCache`]: distributed, for multi-instance deployments
//!
//! Values are plain strings; callers own their encoding (an integer for
//! the version ledger, JSON for permission lists, a marker for the
//! blacklist).

pub mod keys;
pub mod memory;
pub mod redis;

use std::time::Duration;

use async_trait::async_trait;

// Re-export backends at crate root
pub use memory::MemoryCache;
pub use redis::RedisCache;

/// Error type for cache write operations.
///
/// Reads never fail: a backend error on `get` is logged and reported as
/// a miss, which only costs a reload from durable storage.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Redis connection error: {0}")]
    Connection(#[from] ::redis::RedisError),
}

impl From<CacheError> for deliver_core::AppError {
    fn from(err: CacheError) -> Self {
        deliver_core::AppError::internal(err)
    }
}

/// Get/put/evict over a string keyspace with per-entry TTL.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Returns the cached value, or `None` on miss, expiry, or backend error.
    async fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key` for `ttl`.
    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Removes `key`; absent keys are not an error.
    async fn evict(&self, key: &str) -> Result<(), CacheError>;
}
