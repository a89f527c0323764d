//! HS256 bearer tokens bound to a user identity.
//!
//! Implements the `TokenIssuer` trait from threadline-core using the
//! `jsonwebtoken` crate. Every login issues two tokens signed with the
//! same secret: a short-lived `access` token presented on each request and
//! a longer-lived `refresh` token. The claims carry a `kind` discriminator
//! so a refresh token is never accepted where an access token is required.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use threadline_core::auth::token::{TokenIdentity, TokenIssuer, TokenPair};
use threadline_types::error::AuthError;
use threadline_types::user::User;

/// Which half of the pair a token is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims for both token kinds.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User id.
    sub: String,
    username: String,
    email: String,
    /// Issued at timestamp.
    iat: i64,
    /// Expiration timestamp.
    exp: i64,
    kind: TokenKind,
}

/// HS256 implementation of `TokenIssuer`.
pub struct JwtTokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl JwtTokenIssuer {
    /// Create an issuer from a shared secret and the two lifetimes.
    pub fn new(secret: &str, access_ttl_minutes: i64, refresh_ttl_days: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl: Duration::minutes(access_ttl_minutes),
            refresh_ttl: Duration::days(refresh_ttl_days),
        }
    }

    fn sign(&self, user: &User, kind: TokenKind, ttl: Duration) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            kind,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| AuthError::SigningFailed)
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue_pair(&self, user: &User) -> Result<TokenPair, AuthError> {
        Ok(TokenPair {
            access: self.sign(user, TokenKind::Access, self.access_ttl)?,
            refresh: self.sign(user, TokenKind::Refresh, self.refresh_ttl)?,
        })
    }

    fn verify_access(&self, token: &str) -> Result<TokenIdentity, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // No audience claim is issued
        validation.validate_aud = false;

        let data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        let claims = data.claims;
        if claims.kind != TokenKind::Access {
            return Err(AuthError::InvalidToken(
                "refresh token presented as access token".to_string(),
            ));
        }

        let user_id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| AuthError::InvalidToken("non-numeric subject".to_string()))?;

        Ok(TokenIdentity {
            user_id,
            username: claims.username,
            email: claims.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_user() -> User {
        User {
            id: 7,
            username: "will".to_string(),
            email: "will@example.com".to_string(),
            password_hash: "hash".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let issuer = JwtTokenIssuer::new("test-secret", 60, 7);
        let pair = issuer.issue_pair(&test_user()).unwrap();

        let identity = issuer.verify_access(&pair.access).unwrap();
        assert_eq!(
            identity,
            TokenIdentity {
                user_id: 7,
                username: "will".to_string(),
                email: "will@example.com".to_string(),
            }
        );
    }

    #[test]
    fn test_refresh_token_rejected_as_access() {
        let issuer = JwtTokenIssuer::new("test-secret", 60, 7);
        let pair = issuer.issue_pair(&test_user()).unwrap();

        let err = issuer.verify_access(&pair.refresh).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn test_expired_access_token_rejected() {
        // Expired two hours ago, well past the default decode leeway.
        let issuer = JwtTokenIssuer::new("test-secret", -120, 7);
        let pair = issuer.issue_pair(&test_user()).unwrap();

        let err = issuer.verify_access(&pair.access).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = JwtTokenIssuer::new("test-secret", 60, 7);
        let other = JwtTokenIssuer::new("other-secret", 60, 7);
        let pair = issuer.issue_pair(&test_user()).unwrap();

        let err = other.verify_access(&pair.access).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let issuer = JwtTokenIssuer::new("test-secret", 60, 7);
        let err = issuer.verify_access("not.a.jwt").unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }
}
