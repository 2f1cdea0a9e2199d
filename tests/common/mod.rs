//! In-memory fakes standing in for the Postgres-backed stores so the
//! session lifecycle can be exercised end-to-end without a database.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use sqlx::postgres::PgPool;

use deliver::modules::auth::service::AuthService;
use deliver::state::AppState;
use deliver_cache::MemoryCache;
use deliver_config::JwtConfig;
use deliver_core::{AppError, hash_password};
use deliver_models::User;
use deliver_session::postgres::sha256_hex;
use deliver_session::{
    CachedPermissions, CachedSidBlacklist, CachedVersionLedger, PermissionSource, SessionStore,
    SidBlacklist, UserStore, VersionLedger,
};

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        issuer: "deliver".to_string(),
        secret: "integration-test-secret-at-least-32-chars".to_string(),
        access_token_expiry: 900,
        refresh_token_expiry: 604800,
    }
}

#[derive(Default)]
pub struct MemUserStore {
    users: Mutex<HashMap<i64, User>>,
}

impl MemUserStore {
    pub fn with_user(id: i64, email: &str, password: &str) -> Self {
        let store = Self::default();
        store.insert(id, email, password);
        store
    }

    #[allow(dead_code)]
    pub fn insert(&self, id: i64, email: &str, password: &str) {
        let user = User {
            id,
            email: email.to_string(),
            password_hash: hash_password(password).unwrap(),
            token_version: 1,
        };
        self.users.lock().unwrap().insert(id, user);
    }
}

#[async_trait]
impl UserStore for MemUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn current_token_version(&self, id: i64) -> Result<i64, AppError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .get(&id)
            .map(|u| u.token_version)
            .unwrap_or(1))
    }

    async fn increment_token_version(&self, id: i64) -> Result<(), AppError> {
        if let Some(user) = self.users.lock().unwrap().get_mut(&id) {
            user.token_version += 1;
        }
        Ok(())
    }
}

struct SessionRow {
    sid: String,
    user_id: i64,
    refresh_hash: String,
    revoked: bool,
    expires_at: DateTime<Utc>,
}

#[derive(Default)]
pub struct MemSessionStore {
    rows: Mutex<Vec<SessionRow>>,
}

impl MemSessionStore {
    #[allow(dead_code)]
    pub fn live_session_count(&self, user_id: i64) -> usize {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id && !r.revoked && r.expires_at > Utc::now())
            .count()
    }

    #[allow(dead_code)]
    pub fn total_row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl SessionStore for MemSessionStore {
    async fn create_session(
        &self,
        user_id: i64,
        sid: &str,
        refresh_secret: &str,
        expires_at: DateTime<Utc>,
        _device_info: Option<&str>,
    ) -> Result<(), AppError> {
        self.rows.lock().unwrap().push(SessionRow {
            sid: sid.to_string(),
            user_id,
            refresh_hash: sha256_hex(refresh_secret),
            revoked: false,
            expires_at,
        });
        Ok(())
    }

    async fn rotate_session(
        &self,
        old_sid: &str,
        new_sid: &str,
        new_refresh_secret: &str,
        new_expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let mut rows = self.rows.lock().unwrap();

        // Compare-and-set on the revoked flag, same as the SQL UPDATE
        // with its WHERE revoked = FALSE guard.
        let user_id = match rows
            .iter_mut()
            .find(|r| r.sid == old_sid && !r.revoked && r.expires_at > Utc::now())
        {
            Some(row) => {
                row.revoked = true;
                row.user_id
            }
            None => {
                return Err(AppError::session_not_found("Session not found"));
            }
        };

        rows.push(SessionRow {
            sid: new_sid.to_string(),
            user_id,
            refresh_hash: sha256_hex(new_refresh_secret),
            revoked: false,
            expires_at: new_expires_at,
        });
        Ok(())
    }

    async fn revoke_by_sid(&self, sid: &str) -> Result<(), AppError> {
        for row in self.rows.lock().unwrap().iter_mut() {
            if row.sid == sid {
                row.revoked = true;
            }
        }
        Ok(())
    }

    async fn revoke_all(&self, user_id: i64) -> Result<(), AppError> {
        for row in self.rows.lock().unwrap().iter_mut() {
            if row.user_id == user_id {
                row.revoked = true;
            }
        }
        Ok(())
    }

    async fn is_refresh_valid(
        &self,
        user_id: i64,
        sid: &str,
        refresh_secret: &str,
    ) -> Result<bool, AppError> {
        let hash = sha256_hex(refresh_secret);
        Ok(self.rows.lock().unwrap().iter().any(|r| {
            r.user_id == user_id
                && r.sid == sid
                && !r.revoked
                && r.expires_at > Utc::now()
                && r.refresh_hash == hash
        }))
    }
}

pub struct FixedPermissions {
    codes: Vec<String>,
}

impl FixedPermissions {
    pub fn new(codes: &[&str]) -> Self {
        Self {
            codes: codes.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[async_trait]
impl PermissionSource for FixedPermissions {
    async fn permission_codes_for_user(&self, _user_id: i64) -> Result<Vec<String>, AppError> {
        Ok(self.codes.clone())
    }
}

/// Fully wired session core over in-memory backends.
pub struct TestHarness {
    pub service: Arc<AuthService>,
    #[allow(dead_code)]
    pub users: Arc<MemUserStore>,
    #[allow(dead_code)]
    pub sessions: Arc<MemSessionStore>,
    pub versions: Arc<dyn VersionLedger>,
    pub blacklist: Arc<dyn SidBlacklist>,
    pub jwt_config: JwtConfig,
}

impl TestHarness {
    pub fn new(users: MemUserStore, permission_codes: &[&str]) -> Self {
        let jwt_config = test_jwt_config();
        let users = Arc::new(users);
        let sessions = Arc::new(MemSessionStore::default());
        let cache = Arc::new(MemoryCache::new(256));

        let versions: Arc<dyn VersionLedger> = Arc::new(CachedVersionLedger::new(
            users.clone(),
            cache.clone(),
            Duration::from_secs(60),
        ));
        let blacklist: Arc<dyn SidBlacklist> = Arc::new(CachedSidBlacklist::new(
            cache.clone(),
            Duration::from_secs(jwt_config.access_token_expiry as u64),
        ));
        let permissions = Arc::new(CachedPermissions::new(
            Arc::new(FixedPermissions::new(permission_codes)),
            cache,
            Duration::from_secs(60),
        ));

        let service = Arc::new(AuthService::new(
            users.clone(),
            sessions.clone(),
            versions.clone(),
            blacklist.clone(),
            permissions,
            jwt_config.clone(),
        ));

        Self {
            service,
            users,
            sessions,
            versions,
            blacklist,
            jwt_config,
        }
    }

    /// Application state over this harness's stores. The pool connects
    /// lazily and is never touched by the extractors under test.
    #[allow(dead_code)]
    pub fn app_state(&self) -> AppState {
        AppState {
            db: PgPool::connect_lazy("postgres://localhost/deliver_test")
                .expect("lazy pool from a well-formed URL"),
            jwt_config: self.jwt_config.clone(),
            auth_service: self.service.clone(),
            versions: self.versions.clone(),
            blacklist: self.blacklist.clone(),
        }
    }
}
