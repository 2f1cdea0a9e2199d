//! JWT mint and verify functions.
//!
//! Tokens are HS256-signed and issuer-checked. Verification distinguishes
//! exactly two failure kinds: [`ErrorKind::TokenExpired`] for a past
//! `exp`, and [`ErrorKind::InvalidToken`] for everything else (bad
//! signature, wrong issuer, malformed structure, wrong token type,
//! missing claims). The coarse second bucket is intentional: callers
//! must not be able to tell a forged token from a real-but-dead one.
//!
//! [`ErrorKind::TokenExpired`]: deliver_core::ErrorKind::TokenExpired
//! [`ErrorKind::InvalidToken`]: deliver_core::ErrorKind::InvalidToken

use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};

use deliver_config::JwtConfig;
use deliver_core::AppError;

use crate::claims::{AccessClaims, RefreshClaims, TOKEN_TYPE_ACCESS, TOKEN_TYPE_REFRESH};

/// Creates an access token embedding the authority and version snapshot.
///
/// `exp = now + access_token_expiry`. The snapshot reflects the caller's
/// reads at mint time; it is refreshed only on login and rotation.
pub fn create_access_token(
    user_id: i64,
    email: &str,
    authorities: Vec<String>,
    token_version: i64,
    sid: &str,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp();

    let claims = AccessClaims {
        iss: jwt_config.issuer.clone(),
        sub: user_id.to_string(),
        email: email.to_string(),
        authorities,
        token_type: TOKEN_TYPE_ACCESS.to_string(),
        ver: token_version,
        sid: sid.to_string(),
        iat: now,
        exp: now + jwt_config.access_token_expiry,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(AppError::internal)
}

/// Creates a refresh token bound to `sid`.
///
/// The raw token string doubles as the refresh secret: the session store
/// keeps only its digest.
pub fn create_refresh_token(
    user_id: i64,
    sid: &str,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp();

    let claims = RefreshClaims {
        iss: jwt_config.issuer.clone(),
        sub: user_id.to_string(),
        token_type: TOKEN_TYPE_REFRESH.to_string(),
        sid: sid.to_string(),
        iat: now,
        exp: now + jwt_config.refresh_token_expiry,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(AppError::internal)
}

/// Verifies an access token: signature, issuer, expiry, and type.
pub fn verify_access_token(token: &str, jwt_config: &JwtConfig) -> Result<AccessClaims, AppError> {
    let claims = decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &validation(jwt_config),
    )
    .map(|data| data.claims)
    .map_err(map_jwt_error)?;

    if claims.token_type != TOKEN_TYPE_ACCESS {
        return Err(AppError::invalid_token("Not an access token"));
    }

    Ok(claims)
}

/// Verifies a refresh token: signature, issuer, expiry, and type.
pub fn verify_refresh_token(
    token: &str,
    jwt_config: &JwtConfig,
) -> Result<RefreshClaims, AppError> {
    let claims = decode::<RefreshClaims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &validation(jwt_config),
    )
    .map(|data| data.claims)
    .map_err(map_jwt_error)?;

    if claims.token_type != TOKEN_TYPE_REFRESH {
        return Err(AppError::invalid_token("Not a refresh token"));
    }

    Ok(claims)
}

fn validation(jwt_config: &JwtConfig) -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[jwt_config.issuer.as_str()]);
    validation
}

fn map_jwt_error(err: jsonwebtoken::errors::Error) -> AppError {
    match err.kind() {
        ErrorKind::ExpiredSignature => AppError::token_expired("Token has expired"),
        _ => AppError::invalid_token("Invalid token"),
    }
}
