//! Token-version ledger: durable counter, front-cached.
//!
//! Reads hit the cache first; the durable row is authoritative. `bump`
//! increments durably and then evicts, so the next read is forced to
//! reload. A stale entry can outlive a bump in two ways: a lost evict
//! (crash or cache backend failure between the two steps), or a
//! concurrent loader that read the pre-bump durable value and writes it
//! back after the evict (cache-aside has no load/evict ordering). Either
//! way the entry ages out at the TTL; that delays revocation but can
//! never roll a version backwards, so both are tolerated as bounded
//! staleness rather than retried.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use deliver_cache::{Cache, keys};
use deliver_core::AppError;

use crate::store::{UserStore, VersionLedger};

/// Production [`VersionLedger`] over a [`UserStore`] and a [`Cache`].
pub struct CachedVersionLedger {
    users: Arc<dyn UserStore>,
    cache: Arc<dyn Cache>,
    ttl: Duration,
}

impl CachedVersionLedger {
    pub fn new(users: Arc<dyn UserStore>, cache: Arc<dyn Cache>, ttl: Duration) -> Self {
        Self { users, cache, ttl }
    }
}

#[async_trait]
impl VersionLedger for CachedVersionLedger {
    async fn current_version(&self, user_id: i64) -> Result<i64, AppError> {
        let key = keys::token_version(user_id);

        if let Some(cached) = self.cache.get(&key).await {
            if let Ok(version) = cached.parse::<i64>() {
                return Ok(version);
            }
            // Unparseable entry: drop it and fall through to the store.
            let _ = self.cache.evict(&key).await;
        }

        let version = self.users.current_token_version(user_id).await?;

        if let Err(e) = self.cache.put(&key, &version.to_string(), self.ttl).await {
            warn!(user_id, error = %e, "Failed to cache token version");
        }

        Ok(version)
    }

    async fn bump(&self, user_id: i64) -> Result<(), AppError> {
        self.users.increment_token_version(user_id).await?;

        if let Err(e) = self.cache.evict(&keys::token_version(user_id)).await {
            // Bounded staleness: the entry ages out at the TTL.
            warn!(user_id, error = %e, "Failed to evict token version after bump");
        }

        Ok(())
    }

    async fn invalidate(&self, user_id: i64) {
        if let Err(e) = self.cache.evict(&keys::token_version(user_id)).await {
            warn!(user_id, error = %e, "Failed to evict token version");
        }
    }
}
