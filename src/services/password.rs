//! Argon2id password hashing.
//!
//! Hashing and verification run on the blocking pool because Argon2 is
//! CPU-intensive and would stall the async runtime if run inline.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;
use tokio::task;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("blocking task failed: {0}")]
    Join(String),
}

/// Hash a password with a fresh random salt
pub async fn hash(password: String) -> Result<String, PasswordError> {
    task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::Hash(e.to_string()))
    })
    .await
    .map_err(|e| PasswordError::Join(e.to_string()))?
}

/// Verify a password against a stored hash. A malformed stored hash
/// verifies as false rather than erroring, so login stays a generic
/// credential failure.
pub async fn verify(password: String, stored_hash: String) -> Result<bool, PasswordError> {
    task::spawn_blocking(move || {
        let Ok(parsed) = PasswordHash::new(&stored_hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
    .await
    .map_err(|e| PasswordError::Join(e.to_string()))
}
