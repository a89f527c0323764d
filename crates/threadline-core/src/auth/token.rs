//! TokenIssuer trait definition and token value types.
//!
//! The issuer hands out an access/refresh pair bound to a user identity
//! and verifies presented access tokens. The production implementation
//! (HS256 JWTs) lives in threadline-infra.

use threadline_types::error::AuthError;
use threadline_types::user::User;

/// A freshly issued access/refresh token pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    /// Short-lived bearer token sent on every request.
    pub access: String,
    /// Longer-lived token for obtaining new access tokens.
    pub refresh: String,
}

/// The identity recovered from a verified access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenIdentity {
    pub user_id: i64,
    pub username: String,
    pub email: String,
}

/// Issues and verifies bearer tokens.
pub trait TokenIssuer: Send + Sync {
    /// Issue an access/refresh pair bound to the user's identity.
    fn issue_pair(&self, user: &User) -> Result<TokenPair, AuthError>;

    /// Verify an access token and recover the identity it carries.
    ///
    /// Expired, malformed, or refresh-kind tokens are rejected with
    /// [`AuthError::InvalidToken`].
    fn verify_access(&self, token: &str) -> Result<TokenIdentity, AuthError>;
}
