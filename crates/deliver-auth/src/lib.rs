//! # Deliver Auth
//!
//! JWT claims and token utilities for the Deliver API.
//!
//! This crate is the credential codec of the session core: a stateless
//! mint/verify layer that is a pure function of the signing secret.
//!
//! - [`claims`]: claim structures for access and refresh tokens
//! - [`jwt`]: token creation and verification
//!
//! # Token Types
//!
//! - **Access token** ([`AccessClaims`]): short-lived, carries the
//!   point-in-time snapshot of the user's authorities and token version
//! - **Refresh token** ([`RefreshClaims`]): long-lived, carries only the
//!   session id; it grants nothing by itself and must be validated
//!   against the refresh-session store before a new pair is minted
//!
//! # Example
//!
//! ```ignore
//! use deliver_auth::{create_access_token, verify_access_token};
//! use deliver_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(
//!     42,
//!     "user@example.com",
//!     vec!["orders:read".to_string()],
//!     1,
//!     "2f4d...",
//!     &config,
//! )?;
//! let claims = verify_access_token(&token, &config)?;
//! ```

pub mod claims;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::{AccessClaims, RefreshClaims, TOKEN_TYPE_ACCESS, TOKEN_TYPE_REFRESH};
pub use jwt::{
    create_access_token, create_refresh_token, verify_access_token, verify_refresh_token,
};
