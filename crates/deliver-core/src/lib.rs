//! # Deliver Core
//!
//! Core types for the Deliver API.
//!
//! This crate provides the foundational pieces used throughout the
//! application:
//!
//! - [`errors`]: the tagged application error type with HTTP response
//!   conversion
//! - [`password`]: secure password hashing and verification
//!
//! # Example
//!
//! ```ignore
//! use deliver_core::{AppError, ErrorKind};
//! use deliver_core::password::{hash_password, verify_password};
//!
//! let hash = hash_password("secure_password")?;
//! assert!(verify_password("secure_password", &hash)?);
//!
//! let err = AppError::invalid_token("refresh token is no longer valid");
//! assert_eq!(err.kind(), ErrorKind::InvalidToken);
//! ```

pub mod errors;
pub mod password;

// Re-export commonly used types at crate root
pub use errors::{AppError, ErrorKind};
pub use password::{hash_password, verify_password};
