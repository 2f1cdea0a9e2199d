//! Authentication request/response DTOs.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login request with email and password.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
    /// Optional client description stored with the refresh session.
    pub device_info: Option<String>,
}

/// Refresh request carrying the previously issued refresh token.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

/// Single-session logout request.
///
/// `access_sid` is mandatory (it drives the blacklist entry); the
/// refresh token is optional and revoked best-effort.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LogoutRequest {
    #[validate(length(min = 1))]
    pub access_sid: String,
    pub refresh_token: Option<String>,
}

/// Token pair issued at login and on every refresh.
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    /// The sid both tokens are bound to; clients present it at logout.
    pub access_sid: String,
}
