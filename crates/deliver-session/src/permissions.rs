//! Permission snapshot cache: user -> authority codes.
//!
//! Cache-or-load from the role/permission join, evicted on role change
//! and logout-all. A stale hit is bounded by the configured TTL.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use deliver_cache::{Cache, keys};
use deliver_core::AppError;

use crate::store::{PermissionCache, PermissionSource};

/// Production [`PermissionCache`] over a [`PermissionSource`] and a [`Cache`].
pub struct CachedPermissions {
    source: Arc<dyn PermissionSource>,
    cache: Arc<dyn Cache>,
    ttl: Duration,
}

impl CachedPermissions {
    pub fn new(source: Arc<dyn PermissionSource>, cache: Arc<dyn Cache>, ttl: Duration) -> Self {
        Self { source, cache, ttl }
    }
}

#[async_trait]
impl PermissionCache for CachedPermissions {
    async fn get_permissions(&self, user_id: i64) -> Result<Vec<String>, AppError> {
        let key = keys::user_permissions(user_id);

        if let Some(cached) = self.cache.get(&key).await {
            match serde_json::from_str::<Vec<String>>(&cached) {
                Ok(codes) => return Ok(codes),
                Err(e) => {
                    warn!(user_id, error = %e, "Dropping undecodable permission cache entry");
                    let _ = self.cache.evict(&key).await;
                }
            }
        }

        let codes = self.source.permission_codes_for_user(user_id).await?;

        let encoded = serde_json::to_string(&codes).map_err(AppError::internal)?;
        if let Err(e) = self.cache.put(&key, &encoded, self.ttl).await {
            warn!(user_id, error = %e, "Failed to cache permissions");
        }

        Ok(codes)
    }

    async fn invalidate(&self, user_id: i64) {
        if let Err(e) = self.cache.evict(&keys::user_permissions(user_id)).await {
            warn!(user_id, error = %e, "Failed to evict permission cache entry");
        }
    }
}
