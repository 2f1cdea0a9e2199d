//! Production Postgres implementations of the durable capabilities.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use sqlx::PgPool;

use deliver_core::AppError;
use deliver_models::User;

use crate::store::{PermissionSource, SessionStore, UserStore};

/// Hex digest used for refresh secrets at rest.
pub fn sha256_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

/// User rows over sqlx.
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, token_version FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, token_version FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn current_token_version(&self, id: i64) -> Result<i64, AppError> {
        let version: Option<i64> =
            sqlx::query_scalar("SELECT token_version FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        // Unset reads as 1, the version every token starts at.
        Ok(version.unwrap_or(1))
    }

    async fn increment_token_version(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET token_version = token_version + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

/// Refresh-session rows over sqlx.
#[derive(Debug, Clone)]
pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn create_session(
        &self,
        user_id: i64,
        sid: &str,
        refresh_secret: &str,
        expires_at: DateTime<Utc>,
        device_info: Option<&str>,
    ) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO refresh_sessions (user_id, sid, refresh_hash, expires_at, device_info)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(user_id)
        .bind(sid)
        .bind(sha256_hex(refresh_secret))
        .bind(expires_at)
        .bind(device_info)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn rotate_session(
        &self,
        old_sid: &str,
        new_sid: &str,
        new_refresh_secret: &str,
        new_expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        // Compare-and-set on the revoked flag: only one of two racing
        // rotations sees the old row as live. Both steps commit as a
        // unit so a failed rotation never leaves the old session dead
        // without its successor.
        let source: Option<(i64,)> = sqlx::query_as(
            "UPDATE refresh_sessions
                SET revoked = TRUE
              WHERE sid = $1 AND revoked = FALSE AND expires_at > now()
             RETURNING user_id",
        )
        .bind(old_sid)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((user_id,)) = source else {
            return Err(AppError::session_not_found(
                "Refresh session not found or already consumed",
            ));
        };

        sqlx::query(
            "INSERT INTO refresh_sessions (user_id, sid, refresh_hash, expires_at)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(user_id)
        .bind(new_sid)
        .bind(sha256_hex(new_refresh_secret))
        .bind(new_expires_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    async fn revoke_by_sid(&self, sid: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE refresh_sessions SET revoked = TRUE WHERE sid = $1")
            .bind(sid)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn revoke_all(&self, user_id: i64) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE refresh_sessions SET revoked = TRUE WHERE user_id = $1 AND revoked = FALSE",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn is_refresh_valid(
        &self,
        user_id: i64,
        sid: &str,
        refresh_secret: &str,
    ) -> Result<bool, AppError> {
        let found: Option<i32> = sqlx::query_scalar(
            "SELECT 1 FROM refresh_sessions
              WHERE user_id = $1
                AND sid = $2
                AND revoked = FALSE
                AND expires_at > now()
                AND refresh_hash = $3
              LIMIT 1",
        )
        .bind(user_id)
        .bind(sid)
        .bind(sha256_hex(refresh_secret))
        .fetch_optional(&self.pool)
        .await?;

        Ok(found.is_some())
    }
}

/// Permission join over sqlx.
#[derive(Debug, Clone)]
pub struct PgPermissionSource {
    pool: PgPool,
}

impl PgPermissionSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PermissionSource for PgPermissionSource {
    async fn permission_codes_for_user(&self, user_id: i64) -> Result<Vec<String>, AppError> {
        let codes: Vec<String> = sqlx::query_scalar(
            "SELECT p.code
               FROM permissions p
               JOIN role_permissions rp ON rp.permission_id = p.id
               JOIN user_roles ur ON ur.role_id = rp.role_id
              WHERE ur.user_id = $1
              ORDER BY p.code",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(codes)
    }
}
