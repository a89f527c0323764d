//! Axum router configuration with middleware.
//!
//! Middleware: CORS, request tracing. Paths keep their trailing slashes;
//! that is the surface clients were built against.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Streaming completion
        .route(
            "/chat/completion/",
            post(handlers::completion::chat_completion),
        )
        // Chat CRUD
        .route(
            "/chats/",
            get(handlers::chat::list_chats).post(handlers::chat::create_chat),
        )
        .route(
            "/chats/{chat_id}/messages/",
            get(handlers::chat::list_messages),
        )
        // Auth
        .route("/auth/register/", post(handlers::auth::register))
        .route("/auth/login/", post(handlers::auth::login))
        // Liveness
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint (no auth required).
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
