//! User record as the session core sees it.

use sqlx::FromRow;

/// A user row, reduced to the fields the session protocol needs.
///
/// `token_version` is monotonically non-decreasing and bumped exactly on
/// a global-logout event; access tokens embedding an older value are
/// rejected at the request gate.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    /// bcrypt digest; the plain password is never stored.
    pub password_hash: String,
    pub token_version: i64,
}
