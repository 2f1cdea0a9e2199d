use std::env;

/// Token signing configuration.
///
/// The secret must be at least 32 bytes for HS256; the issuer is embedded
/// in every minted token and required during verification so tokens from
/// a different service never validate here.
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub issuer: String,
    pub secret: String,
    pub access_token_expiry: i64,
    pub refresh_token_expiry: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self {
            issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "deliver".to_string()),
            secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "your-secret-key-change-in-production-32b".to_string()),
            access_token_expiry: env::var("JWT_ACCESS_EXPIRY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(900), // 15 minutes
            refresh_token_expiry: env::var("JWT_REFRESH_EXPIRY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(604800), // 7 days
        }
    }
}
