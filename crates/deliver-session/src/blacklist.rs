//! Revocation blacklist: sid -> revoked, self-expiring.
//!
//! Written once per logout, read on every authenticated request.
//! Presence of an entry rejects the sid regardless of the token's
//! signature validity. Entries carry their own expiry, floored at the
//! configured access-token TTL: a cache-wide expiry shorter than the
//! access TTL would let a long-lived access token outlive its blacklist
//! entry and reopen a replay window.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use deliver_cache::{Cache, keys};
use deliver_core::AppError;

use crate::store::SidBlacklist;

const REVOKED_MARKER: &str = "1";

/// Production [`SidBlacklist`] over a [`Cache`].
pub struct CachedSidBlacklist {
    cache: Arc<dyn Cache>,
    /// Minimum revocation window; set to the access-token TTL.
    min_ttl: Duration,
}

impl CachedSidBlacklist {
    pub fn new(cache: Arc<dyn Cache>, min_ttl: Duration) -> Self {
        Self { cache, min_ttl }
    }
}

#[async_trait]
impl SidBlacklist for CachedSidBlacklist {
    async fn revoke_temporarily(&self, sid: &str, ttl: Duration) -> Result<(), AppError> {
        let window = ttl.max(self.min_ttl);
        self.cache
            .put(&keys::sid_blacklist(sid), REVOKED_MARKER, window)
            .await?;

        Ok(())
    }

    async fn is_revoked(&self, sid: &str) -> bool {
        self.cache.get(&keys::sid_blacklist(sid)).await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deliver_cache::MemoryCache;

    fn blacklist(min_ttl: Duration) -> CachedSidBlacklist {
        CachedSidBlacklist::new(Arc::new(MemoryCache::new(64)), min_ttl)
    }

    #[tokio::test]
    async fn revoked_sid_is_reported() {
        let bl = blacklist(Duration::from_secs(60));

        assert!(!bl.is_revoked("sid-a").await);
        bl.revoke_temporarily("sid-a", Duration::from_secs(60))
            .await
            .unwrap();
        assert!(bl.is_revoked("sid-a").await);
        assert!(!bl.is_revoked("sid-b").await);
    }

    #[tokio::test]
    async fn requested_ttl_is_floored_to_access_ttl() {
        // A 10ms request with a 60s floor must still be revoked after
        // the 10ms have passed.
        let bl = blacklist(Duration::from_secs(60));
        bl.revoke_temporarily("sid-a", Duration::from_millis(10))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(bl.is_revoked("sid-a").await);
    }

    #[tokio::test]
    async fn entries_expire_after_their_window() {
        let bl = blacklist(Duration::from_millis(20));
        bl.revoke_temporarily("sid-a", Duration::from_millis(20))
            .await
            .unwrap();
        assert!(bl.is_revoked("sid-a").await);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!bl.is_revoked("sid-a").await);
    }
}
