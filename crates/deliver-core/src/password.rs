//! Password hashing with bcrypt.
//!
//! The stored hash is one-way; login compares with [`verify_password`],
//! which delegates the timing-safe comparison to the bcrypt primitive.

use bcrypt::{DEFAULT_COST, hash, verify};

use crate::errors::AppError;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    Ok(hash(password, DEFAULT_COST)?)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    Ok(verify(password, hash)?)
}
