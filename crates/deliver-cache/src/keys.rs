//! Cache key generation.
//!
//! Provides consistent, prefixed cache keys so the security caches never
//! collide with each other or with other users of a shared Redis.

/// Prefix for all cache keys.
const CACHE_PREFIX: &str = "deliver";

fn build_key(parts: &[&str]) -> String {
    format!("{}:{}", CACHE_PREFIX, parts.join(":"))
}

/// Key for a user's cached token version.
pub fn token_version(user_id: i64) -> String {
    build_key(&["user", &user_id.to_string(), "token-version"])
}

/// Key for a revoked session id on the blacklist.
pub fn sid_blacklist(sid: &str) -> String {
    build_key(&["sid", sid, "revoked"])
}

/// Key for a user's cached permission snapshot.
pub fn user_permissions(user_id: i64) -> String {
    build_key(&["user", &user_id.to_string(), "permissions"])
}
