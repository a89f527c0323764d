//! Argon2id password hashing for stored credentials.
//!
//! Implements the `PasswordHasher` trait from threadline-core using the
//! `argon2` crate (RustCrypto ecosystem). Each hash gets a fresh random
//! salt and is stored as a self-describing PHC string, so parameters can
//! be upgraded later without invalidating existing hashes.
//!
//! SECURITY: errors never carry the plaintext or the stored hash.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::Argon2;

use threadline_core::auth::hash::PasswordHasher;
use threadline_types::error::AuthError;

/// Argon2id implementation of `PasswordHasher`.
///
/// Uses the crate's default parameters (Argon2id v19, OWASP-aligned
/// memory/time costs).
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    /// Create a new hasher.
    pub fn new() -> Self {
        Self
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| AuthError::HashingFailed)
    }

    fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(hash).map_err(|_| AuthError::HashingFailed)?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(_) => Err(AuthError::HashingFailed),
        }
    }
}
