use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;

use deliver_cache::{Cache, MemoryCache, RedisCache};
use deliver_config::{CacheConfig, JwtConfig};
use deliver_db::init_db_pool;
use deliver_session::{
    CachedPermissions, CachedSidBlacklist, CachedVersionLedger, PermissionCache,
    PgPermissionSource, PgSessionStore, PgUserStore, SessionStore, SidBlacklist, UserStore,
    VersionLedger,
};

use crate::modules::auth::service::AuthService;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub auth_service: Arc<AuthService>,
    /// Read by the request gate on every authenticated call.
    pub versions: Arc<dyn VersionLedger>,
    pub blacklist: Arc<dyn SidBlacklist>,
}

pub async fn init_app_state() -> AppState {
    let db = init_db_pool().await;
    let jwt_config = JwtConfig::from_env();
    let cache_config = CacheConfig::from_env();

    // One cache backend shared by all three security caches; Redis when
    // configured (multi-instance), in-process otherwise.
    let cache: Arc<dyn Cache> = match &cache_config.redis_url {
        Some(url) => Arc::new(
            RedisCache::new(url)
                .await
                .expect("Failed to connect to Redis"),
        ),
        None => Arc::new(MemoryCache::new(cache_config.memory_max_entries)),
    };

    let users: Arc<dyn UserStore> = Arc::new(PgUserStore::new(db.clone()));
    let sessions: Arc<dyn SessionStore> = Arc::new(PgSessionStore::new(db.clone()));

    let versions: Arc<dyn VersionLedger> = Arc::new(CachedVersionLedger::new(
        users.clone(),
        cache.clone(),
        cache_config.token_version_ttl,
    ));
    let blacklist: Arc<dyn SidBlacklist> = Arc::new(CachedSidBlacklist::new(
        cache.clone(),
        Duration::from_secs(jwt_config.access_token_expiry.max(0) as u64),
    ));
    let permissions: Arc<dyn PermissionCache> = Arc::new(CachedPermissions::new(
        Arc::new(PgPermissionSource::new(db.clone())),
        cache,
        cache_config.permission_ttl,
    ));

    let auth_service = Arc::new(AuthService::new(
        users,
        sessions,
        versions.clone(),
        blacklist.clone(),
        permissions,
        jwt_config.clone(),
    ));

    AppState {
        db,
        jwt_config,
        auth_service,
        versions,
        blacklist,
    }
}
