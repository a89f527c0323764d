//! Bearer token authentication extractor.
//!
//! Extracts the access token from `Authorization: Bearer <token>`,
//! verifies it against the token issuer, and exposes the identity the
//! claims carry. Tokens are self-contained; no database lookup happens on
//! the request path.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use threadline_core::auth::token::TokenIssuer;

use crate::http::error::AppError;
use crate::state::AppState;

/// The authenticated caller. Extracting this validates the bearer token.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer(parts)?;

        let identity = state
            .auth_service
            .tokens()
            .verify_access(&token)
            .map_err(|e| AppError::Unauthorized(e.to_string()))?;

        Ok(CurrentUser {
            id: identity.user_id,
            username: identity.username,
            email: identity.email,
        })
    }
}

/// Extract the bearer token from the Authorization header.
fn extract_bearer(parts: &Parts) -> Result<String, AppError> {
    let auth = parts.headers.get("authorization").ok_or_else(|| {
        AppError::Unauthorized(
            "Missing token. Provide via 'Authorization: Bearer <token>' header.".to_string(),
        )
    })?;

    let auth_str = auth
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid Authorization header encoding".to_string()))?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) => Ok(token.trim().to_string()),
        None => Err(AppError::Unauthorized(
            "Authorization header must use the Bearer scheme".to_string(),
        )),
    }
}
