//! Registration and login handlers.
//!
//! Endpoints:
//! - POST /auth/register/ - create an account, no token issued
//! - POST /auth/login/    - verify credentials, issue token pair
//!
//! Body fields are Options so an absent field surfaces as the service's
//! 400 rather than a deserialization rejection.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::http::error::AppError;
use crate::state::AppState;

/// Request body for registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// POST /auth/register/ - create a new account.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let user = state
        .auth_service
        .register(
            body.username.as_deref().unwrap_or(""),
            body.email.as_deref().unwrap_or(""),
            body.password.as_deref().unwrap_or(""),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "detail": "registration successful",
            "username": user.username,
            "email": user.email,
        })),
    ))
}

/// POST /auth/login/ - verify credentials and issue tokens.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let (user, pair) = state
        .auth_service
        .login(
            body.email.as_deref().unwrap_or(""),
            body.password.as_deref().unwrap_or(""),
        )
        .await?;

    Ok(Json(json!({
        "token": pair.access,
        "refresh": pair.refresh,
        "username": user.username,
        "email": user.email,
    })))
}
