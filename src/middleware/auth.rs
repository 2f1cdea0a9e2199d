//! Request authenticator.
//!
//! Per-request gate over a presented access token. It checks claims and
//! the two hot caches (token version, sid blacklist) and never touches
//! the durable session store. Authority comes from the token's embedded
//! snapshot, not a fresh query; staleness is bounded by the access TTL.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use deliver_auth::verify_access_token;
use deliver_config::JwtConfig;
use deliver_core::AppError;
use deliver_session::{SidBlacklist, VersionLedger};

use crate::state::AppState;

/// The authenticated caller's identity and authority snapshot.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub email: String,
    pub sid: String,
    pub token_version: i64,
    pub authorities: Vec<String>,
}

impl AuthUser {
    /// Check if the user has a specific permission
    pub fn has_permission(&self, permission: &str) -> bool {
        self.authorities.iter().any(|p| p == permission)
    }

    /// Check if the user has any of the specified permissions
    pub fn has_any_permission(&self, permissions: &[&str]) -> bool {
        permissions.iter().any(|p| self.has_permission(p))
    }

    /// Check if the user has all of the specified permissions
    pub fn has_all_permissions(&self, permissions: &[&str]) -> bool {
        permissions.iter().all(|p| self.has_permission(p))
    }
}

/// Runs the full gate against an already-extracted bearer token.
///
/// Order matters and short-circuits on first failure:
/// codec (signature, issuer, expiry, type, claim shape) -> numeric
/// subject -> non-empty sid -> version ledger -> blacklist.
pub async fn authenticate(
    token: &str,
    jwt_config: &JwtConfig,
    versions: &dyn VersionLedger,
    blacklist: &dyn SidBlacklist,
) -> Result<AuthUser, AppError> {
    let claims = verify_access_token(token, jwt_config)?;

    let user_id = claims
        .user_id()
        .ok_or_else(|| AppError::invalid_token("Token subject is not a user id"))?;

    if claims.sid.trim().is_empty() {
        return Err(AppError::invalid_token("Token is missing its session id"));
    }

    // Covers logout-all and any forced version bump.
    let current = versions.current_version(user_id).await?;
    if claims.ver < current {
        return Err(AppError::token_version_outdated(
            "Token version is outdated, please log in again",
        ));
    }

    // Covers single-session logout.
    if blacklist.is_revoked(&claims.sid).await {
        return Err(AppError::session_revoked(
            "Session has been logged out, please log in again",
        ));
    }

    Ok(AuthUser {
        user_id,
        email: claims.email,
        sid: claims.sid,
        token_version: claims.ver,
        authorities: claims.authorities,
    })
}

fn bearer_token(parts: &Parts) -> Result<Option<&str>, AppError> {
    let Some(value) = parts.headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let header = value
        .to_str()
        .map_err(|_| AppError::invalid_token("Invalid authorization header"))?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::invalid_token("Invalid authorization header format"))?
        .trim();

    if token.is_empty() {
        return Err(AppError::invalid_token("Invalid authorization header"));
    }

    Ok(Some(token))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?
            .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

        authenticate(
            token,
            &state.jwt_config,
            state.versions.as_ref(),
            state.blacklist.as_ref(),
        )
        .await
    }
}

/// Optional variant: no credential at all means anonymous, but a
/// presented credential that fails the gate still rejects the request.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match bearer_token(parts)? {
            None => Ok(MaybeAuthUser(None)),
            Some(token) => {
                let user = authenticate(
                    token,
                    &state.jwt_config,
                    state.versions.as_ref(),
                    state.blacklist.as_ref(),
                )
                .await?;
                Ok(MaybeAuthUser(Some(user)))
            }
        }
    }
}
