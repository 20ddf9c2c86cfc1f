//! Password hashing and verification (Argon2id, PHC string format).
//!
//! The hash embeds algorithm, parameters and salt, so nothing beyond the
//! string needs storing. Comparison runs through the argon2 verifier, which
//! does not leak the mismatch position.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use tracing::debug;

use crate::error::AppError;

/// Hash a plaintext password. Salted per call, so two hashes of the same
/// password differ while both verify.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))
}

/// Verify a plaintext password against a stored hash.
///
/// Malformed hash input verifies as `false`, never as an error: at the login
/// boundary every verification failure must look the same.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!(error = %e, "stored password hash is malformed");
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
