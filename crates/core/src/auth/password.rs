//! Argon2id password hashes for accounts created by the user factory.
//!
//! Sign-in happens elsewhere; this service only stores hashes in PHC format
//! so the sign-in service can verify them.

use argon2::{
    Argon2, PasswordHash,
    password_hash::{PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

/// Shortest password the user factory accepts.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Errors from hashing or checking a password.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Password is shorter than [`MIN_PASSWORD_LEN`].
    #[error("password must be at least {MIN_PASSWORD_LEN} characters")]
    TooShort,

    /// Argon2 failed to produce a hash.
    #[error("failed to hash password: {0}")]
    HashError(String),

    /// Stored hash is not a valid PHC string.
    #[error("invalid password hash format")]
    InvalidHash,
}

/// Hashes a password with a fresh random salt.
///
/// # Errors
///
/// Returns `TooShort` for passwords under [`MIN_PASSWORD_LEN`] characters and
/// `HashError` if Argon2 fails.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(PasswordError::TooShort);
    }

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::HashError(e.to_string()))
}

/// Checks a password against a stored hash.
///
/// # Errors
///
/// Returns `InvalidHash` if `hash` cannot be parsed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
