//! # Deliver Models
//!
//! Domain models and DTOs for the Deliver API:
//!
//! - [`users`]: the user record as the session core sees it
//! - [`auth`]: authentication request/response DTOs

pub mod auth;
pub mod users;

// Re-export commonly used types at crate root
pub use auth::{LoginRequest, LogoutRequest, RefreshRequest, TokenResponse};
pub use users::User;
