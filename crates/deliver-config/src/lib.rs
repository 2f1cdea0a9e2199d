//! # Deliver Config
//!
//! Configuration types for the Deliver API, loaded from environment
//! variables with development defaults:
//!
//! - [`jwt`]: token signing and TTL configuration
//! - [`cache`]: TTLs and sizing for the security caches
//!
//! # Example
//!
//! ```ignore
//! use deliver_config::{CacheConfig, JwtConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let cache_config = CacheConfig::from_env();
//! ```

pub mod cache;
pub mod jwt;

// Re-export commonly used types at crate root
pub use cache::CacheConfig;
pub use jwt::JwtConfig;
