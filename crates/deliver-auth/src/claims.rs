//! JWT claim structures for authentication tokens.
//!
//! Both token types carry `{iss, sub, type, sid, iat, exp}`; the access
//! token additionally snapshots the user's email, authority codes, and
//! token version at mint time. The snapshot is deliberately not
//! re-queried per request; staleness is bounded by the access TTL plus
//! the version/blacklist gates.

use serde::{Deserialize, Serialize};

/// `type` claim value for access tokens.
pub const TOKEN_TYPE_ACCESS: &str = "access";
/// `type` claim value for refresh tokens.
pub const TOKEN_TYPE_REFRESH: &str = "refresh";

/// JWT claims for access tokens.
///
/// Everything the request authenticator needs is embedded here so the
/// hot path never touches the durable session store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Issuing service identity, checked during verification.
    pub iss: String,
    /// User ID (subject claim), stringified.
    pub sub: String,
    /// User's email address.
    pub email: String,
    /// Authority codes snapshotted at mint time.
    pub authorities: Vec<String>,
    /// Token type discriminator, always `"access"`.
    #[serde(rename = "type")]
    pub token_type: String,
    /// User's token version at mint time.
    pub ver: i64,
    /// Opaque session identifier binding this token to a refresh session.
    pub sid: String,
    /// Issued-at timestamp (Unix seconds).
    pub iat: i64,
    /// Expiration timestamp (Unix seconds).
    pub exp: i64,
}

/// JWT claims for refresh tokens.
///
/// Carries no authority snapshot: a refresh token only proves the right
/// to attempt a rotation, which re-reads version and permissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Issuing service identity, checked during verification.
    pub iss: String,
    /// User ID (subject claim), stringified.
    pub sub: String,
    /// Token type discriminator, always `"refresh"`.
    #[serde(rename = "type")]
    pub token_type: String,
    /// Opaque session identifier, the rotation key.
    pub sid: String,
    /// Issued-at timestamp (Unix seconds).
    pub iat: i64,
    /// Expiration timestamp (Unix seconds).
    pub exp: i64,
}

impl AccessClaims {
    /// Parses the subject claim into a user id.
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

impl RefreshClaims {
    /// Parses the subject claim into a user id.
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_claims_serialize_type_discriminator() {
        let claims = AccessClaims {
            iss: "deliver".to_string(),
            sub: "42".to_string(),
            email: "test@example.com".to_string(),
            authorities: vec!["orders:read".to_string()],
            token_type: TOKEN_TYPE_ACCESS.to_string(),
            ver: 1,
            sid: "abc123".to_string(),
            iat: 1234567800,
            exp: 1234567890,
        };
        let serialized = serde_json::to_string(&claims).unwrap();
        assert!(serialized.contains(r#""type":"access""#));
        assert!(serialized.contains(r#""sid":"abc123""#));
        assert!(serialized.contains(r#""ver":1"#));
    }

    #[test]
    fn refresh_claims_deserialize() {
        let json = r#"{"iss":"deliver","sub":"7","type":"refresh","sid":"deadbeef","iat":100,"exp":200}"#;
        let claims: RefreshClaims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.token_type, TOKEN_TYPE_REFRESH);
        assert_eq!(claims.user_id(), Some(7));
    }

    #[test]
    fn user_id_rejects_non_numeric_subject() {
        let json =
            r#"{"iss":"deliver","sub":"not-a-number","type":"refresh","sid":"s","iat":1,"exp":2}"#;
        let claims: RefreshClaims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.user_id(), None);
    }

    #[test]
    fn access_claims_missing_ver_fails_deserialize() {
        let json = r#"{"iss":"deliver","sub":"42","email":"a@b.c","authorities":[],"type":"access","sid":"s","iat":1,"exp":2}"#;
        assert!(serde_json::from_str::<AccessClaims>(json).is_err());
    }
}
