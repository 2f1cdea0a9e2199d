//! Session orchestrator.
//!
//! Owns every state transition of a logical session: login creates a
//! live refresh session, refresh rotates it, logout blacklists the
//! access sid and best-effort revokes the refresh session, logout-all
//! bumps the token version so every outstanding access token dies at
//! the request gate. The orchestrator is the only writer of session
//! rows and version bumps.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use deliver_auth::{create_access_token, create_refresh_token, verify_refresh_token};
use deliver_config::JwtConfig;
use deliver_core::{AppError, ErrorKind};
use deliver_models::auth::{LoginRequest, RefreshRequest, TokenResponse};
use deliver_session::{PermissionCache, SessionStore, SidBlacklist, UserStore, VersionLedger};

/// Mints a fresh opaque session identifier (UUIDv4, 128 bits, hex).
/// Never reused across rotations.
fn new_sid() -> String {
    Uuid::new_v4().simple().to_string()
}

pub struct AuthService {
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionStore>,
    versions: Arc<dyn VersionLedger>,
    blacklist: Arc<dyn SidBlacklist>,
    permissions: Arc<dyn PermissionCache>,
    jwt_config: JwtConfig,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
        versions: Arc<dyn VersionLedger>,
        blacklist: Arc<dyn SidBlacklist>,
        permissions: Arc<dyn PermissionCache>,
        jwt_config: JwtConfig,
    ) -> Self {
        Self {
            users,
            sessions,
            versions,
            blacklist,
            permissions,
            jwt_config,
        }
    }

    /// Verifies credentials and issues a fresh access/refresh pair bound
    /// to a new sid, persisting the refresh session.
    #[instrument(skip(self, dto), fields(email = %dto.email))]
    pub async fn login(&self, dto: LoginRequest) -> Result<TokenResponse, AppError> {
        let email = dto.email.trim().to_lowercase();

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::bad_credentials("Invalid email or password"))?;

        // Same message for unknown email and wrong password.
        if !deliver_core::verify_password(&dto.password, &user.password_hash)? {
            return Err(AppError::bad_credentials("Invalid email or password"));
        }

        let version = self.versions.current_version(user.id).await?;
        let authorities = self.permissions.get_permissions(user.id).await?;

        let sid = new_sid();

        let refresh_token = create_refresh_token(user.id, &sid, &self.jwt_config)?;
        let refresh_expires_at =
            Utc::now() + Duration::seconds(self.jwt_config.refresh_token_expiry);
        self.sessions
            .create_session(
                user.id,
                &sid,
                &refresh_token,
                refresh_expires_at,
                dto.device_info.as_deref(),
            )
            .await?;

        let access_token = create_access_token(
            user.id,
            &user.email,
            authorities,
            version,
            &sid,
            &self.jwt_config,
        )?;

        info!(user_id = user.id, sid = %sid, "User logged in");

        Ok(TokenResponse {
            access_token,
            refresh_token,
            expires_in: self.jwt_config.access_token_expiry,
            access_sid: sid,
        })
    }

    /// Consumes a refresh token exactly once: validates it against the
    /// session store, rotates the session to a new sid, and re-issues
    /// the pair with a fresh authority/version snapshot.
    ///
    /// Every refresh-side failure surfaces as `TOKEN_INVALID`; callers
    /// cannot distinguish a malformed token from a consumed or revoked
    /// session.
    #[instrument(skip_all)]
    pub async fn refresh(&self, dto: RefreshRequest) -> Result<TokenResponse, AppError> {
        let claims = verify_refresh_token(&dto.refresh_token, &self.jwt_config)
            .map_err(|_| AppError::invalid_token("Refresh token is invalid"))?;

        let user_id = claims
            .user_id()
            .ok_or_else(|| AppError::invalid_token("Refresh token is invalid"))?;
        if claims.sid.trim().is_empty() {
            return Err(AppError::invalid_token("Refresh token is invalid"));
        }

        if !self
            .sessions
            .is_refresh_valid(user_id, &claims.sid, &dto.refresh_token)
            .await?
        {
            return Err(AppError::invalid_token("Refresh token is no longer valid"));
        }

        let new_sid = new_sid();
        let new_refresh = create_refresh_token(user_id, &new_sid, &self.jwt_config)?;
        let new_expires_at = Utc::now() + Duration::seconds(self.jwt_config.refresh_token_expiry);

        // The loser of a concurrent rotation race sees SessionNotFound
        // here and gets the same coarse answer as any other dead token.
        self.sessions
            .rotate_session(&claims.sid, &new_sid, &new_refresh, new_expires_at)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::SessionNotFound => {
                    AppError::invalid_token("Refresh token is no longer valid")
                }
                _ => e,
            })?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::user_not_found("User no longer exists"))?;

        // Re-snapshot on every rotation: this is the only path that
        // picks up permission changes for a long-lived client.
        let version = self.versions.current_version(user_id).await?;
        let authorities = self.permissions.get_permissions(user_id).await?;

        let access_token = create_access_token(
            user_id,
            &user.email,
            authorities,
            version,
            &new_sid,
            &self.jwt_config,
        )?;

        info!(user_id, old_sid = %claims.sid, new_sid = %new_sid, "Session rotated");

        Ok(TokenResponse {
            access_token,
            refresh_token: new_refresh,
            expires_in: self.jwt_config.access_token_expiry,
            access_sid: new_sid,
        })
    }

    /// Single-session logout.
    ///
    /// Blacklisting the access sid is the security-relevant step and the
    /// only one allowed to fail the request. Revoking the refresh
    /// session is best-effort: an unparseable or foreign refresh token
    /// is logged and ignored.
    #[instrument(skip(self, refresh_token))]
    pub async fn logout(
        &self,
        access_sid: &str,
        refresh_token: Option<&str>,
    ) -> Result<(), AppError> {
        let access_ttl = StdDuration::from_secs(self.jwt_config.access_token_expiry.max(0) as u64);
        self.blacklist
            .revoke_temporarily(access_sid, access_ttl)
            .await?;

        if let Some(token) = refresh_token.filter(|t| !t.trim().is_empty()) {
            match verify_refresh_token(token, &self.jwt_config) {
                Ok(claims) => {
                    if let Err(e) = self.sessions.revoke_by_sid(&claims.sid).await {
                        warn!(sid = %claims.sid, error = %e, "Failed to revoke refresh session at logout");
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Ignoring unparseable refresh token at logout");
                }
            }
        }

        info!(access_sid, "Session logged out");

        Ok(())
    }

    /// Global logout for a user.
    ///
    /// The version bump comes first: it is the only mechanism that kills
    /// already-issued, unexpired access tokens. Session revocation then
    /// blocks re-issuance, and the permission eviction prevents the next
    /// login from reading a stale snapshot.
    #[instrument(skip(self))]
    pub async fn logout_all(&self, user_id: i64) -> Result<(), AppError> {
        self.versions.bump(user_id).await?;
        self.sessions.revoke_all(user_id).await?;
        self.permissions.invalidate(user_id).await;

        info!(user_id, "All sessions logged out");

        Ok(())
    }
}
