//! PasswordHasher trait definition.
//!
//! Seam for credential hashing so the service stays free of any concrete
//! algorithm. The production implementation (Argon2id) lives in
//! threadline-infra.

use threadline_types::error::AuthError;

/// Hashes and verifies user credentials.
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password into a self-describing verification
    /// string (salt included).
    fn hash_password(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a plaintext password against a stored hash.
    ///
    /// `Ok(false)` means the password does not match; `Err` is reserved
    /// for corrupt hashes and algorithm failures.
    fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}
