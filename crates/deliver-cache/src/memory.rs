//! In-process cache backend.
//!
//! Entries carry their own expiry instant, so a blacklist entry's window
//! is exactly what the writer asked for rather than a cache-wide policy.
//! Expired entries are dropped lazily on read and swept when the map
//! grows past its configured size, keeping memory bounded under the
//! blacklist's write-on-every-logout load.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::{Cache, CacheError};

#[derive(Debug)]
struct Entry {
    value: String,
    expires_at: Instant,
}

/// Thread-safe in-process cache with per-entry TTL.
#[derive(Debug)]
pub struct MemoryCache {
    entries: DashMap<String, Entry>,
    max_entries: usize,
}

impl MemoryCache {
    /// Creates a cache that sweeps expired entries once it holds
    /// `max_entries` keys.
    ///
    /// The size is advisory, not a hard bound: a write against a full
    /// map of live entries still lands, so the map can exceed
    /// `max_entries` until enough entries expire. Live security state
    /// (an unexpired blacklist entry in particular) is never dropped to
    /// make room.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            max_entries,
        }
    }

    fn sweep_expired(&self) {
        let now = Instant::now();
        self.entries.retain(|_, entry| entry.expires_at > now);
    }

    /// Number of entries currently held, including not-yet-swept expired ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        // The read guard must drop before the remove below, or the two
        // would deadlock on the same shard.
        let expired = match self.entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => {
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            self.entries.remove(key);
        }
        None
    }

    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        if self.entries.len() >= self.max_entries {
            self.sweep_expired();
        }
        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn evict(&self, key: &str) -> Result<(), CacheError> {
        self.entries.remove(key);
        Ok(())
    }
}
