//! Capability traits for the session core.
//!
//! Each trait has one production implementation; tests substitute
//! in-memory fakes. The orchestrator and request gate depend only on
//! these traits, never on a concrete backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

use deliver_core::AppError;
use deliver_models::User;

/// Durable user records, as far as the session protocol cares.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// The durable token version; unset values read as 1.
    async fn current_token_version(&self, id: i64) -> Result<i64, AppError>;

    /// Atomically increments the durable counter
    /// (`version = version + 1` in a single statement, never
    /// read-modify-write from the application).
    async fn increment_token_version(&self, id: i64) -> Result<(), AppError>;
}

/// Durable refresh-session records.
///
/// Rows are never physically deleted; revocation flips a flag so the
/// audit trail survives. At most one live (un-revoked, unexpired) row
/// exists per sid, and a sid is never reused across rotations.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Inserts a new live session. Only `sha256(refresh_secret)` is stored.
    async fn create_session(
        &self,
        user_id: i64,
        sid: &str,
        refresh_secret: &str,
        expires_at: DateTime<Utc>,
        device_info: Option<&str>,
    ) -> Result<(), AppError>;

    /// Atomically supersedes `old_sid` with a new live row bound to
    /// `new_sid` for the same user.
    ///
    /// The revoke of the old row is a compare-and-set on the `revoked`
    /// flag: of two concurrent rotations using the same refresh
    /// credential, exactly one wins; the loser gets
    /// [`ErrorKind::SessionNotFound`] and must fail its refresh.
    ///
    /// [`ErrorKind::SessionNotFound`]: deliver_core::ErrorKind::SessionNotFound
    async fn rotate_session(
        &self,
        old_sid: &str,
        new_sid: &str,
        new_refresh_secret: &str,
        new_expires_at: DateTime<Utc>,
    ) -> Result<(), AppError>;

    /// Marks the session revoked; idempotent.
    async fn revoke_by_sid(&self, sid: &str) -> Result<(), AppError>;

    /// Marks all of the user's live sessions revoked; idempotent.
    async fn revoke_all(&self, user_id: i64) -> Result<(), AppError>;

    /// True iff a row matches on user, sid, un-revoked, unexpired, and
    /// secret digest. All four conditions are the replay defense: a
    /// stolen refresh token dies the moment a rotation revokes its sid.
    async fn is_refresh_valid(
        &self,
        user_id: i64,
        sid: &str,
        refresh_secret: &str,
    ) -> Result<bool, AppError>;
}

/// Per-user monotonic token-version counter, front-cached.
#[async_trait]
pub trait VersionLedger: Send + Sync {
    /// Cache-or-load; unset values default to 1.
    async fn current_version(&self, user_id: i64) -> Result<i64, AppError>;

    /// Durable atomic increment, then cache evict. Once this returns,
    /// reads observe a value >= the post-bump value (a crash between
    /// increment and evict degrades to staleness bounded by the cache
    /// TTL, never to a value below the pre-bump one).
    async fn bump(&self, user_id: i64) -> Result<(), AppError>;

    /// Cache-only eviction.
    async fn invalidate(&self, user_id: i64);
}

/// Short-lived denylist of session ids.
#[async_trait]
pub trait SidBlacklist: Send + Sync {
    /// Marks `sid` revoked for at least `ttl`. Implementations must not
    /// undersize the window below the longest-lived outstanding access
    /// token for the sid.
    async fn revoke_temporarily(&self, sid: &str, ttl: Duration) -> Result<(), AppError>;

    async fn is_revoked(&self, sid: &str) -> bool;
}

/// Authoritative permission lookup (the role/permission join).
#[async_trait]
pub trait PermissionSource: Send + Sync {
    /// Ordered permission codes for the user.
    async fn permission_codes_for_user(&self, user_id: i64) -> Result<Vec<String>, AppError>;
}

/// Cached permission snapshots, invalidate-on-write.
#[async_trait]
pub trait PermissionCache: Send + Sync {
    async fn get_permissions(&self, user_id: i64) -> Result<Vec<String>, AppError>;

    /// Callers changing roles or logging out all sessions must evict,
    /// otherwise stale authority persists for the cache TTL.
    async fn invalidate(&self, user_id: i64);
}
