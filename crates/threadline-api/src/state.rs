//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by the REST API.
//! Services are generic over repository/hasher/issuer traits, but AppState
//! pins them to the concrete infra implementations. The agent gateway
//! stays a trait object so tests can substitute a scripted one.

use std::path::Path;
use std::sync::Arc;

use threadline_core::agent::gateway::AgentGateway;
use threadline_core::auth::service::AuthService;
use threadline_core::chat::service::ChatService;
use threadline_infra::agent::HttpAgentGateway;
use threadline_infra::config::AppConfig;
use threadline_infra::crypto::password::Argon2PasswordHasher;
use threadline_infra::crypto::token::JwtTokenIssuer;
use threadline_infra::sqlite::chat::SqliteChatRepository;
use threadline_infra::sqlite::pool::DatabasePool;
use threadline_infra::sqlite::user::SqliteUserRepository;

/// Concrete type aliases for the service generics pinned to infra
/// implementations.
pub type ConcreteAuthService =
    AuthService<SqliteUserRepository, Argon2PasswordHasher, JwtTokenIssuer>;

pub type ConcreteChatService = ChatService<SqliteChatRepository>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<ConcreteAuthService>,
    pub chat_service: Arc<ConcreteChatService>,
    pub gateway: Arc<dyn AgentGateway>,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: connect to the database in
    /// `data_dir` and wire the production gateway.
    pub async fn init(config: &AppConfig, data_dir: &Path) -> anyhow::Result<Self> {
        let db_url = format!(
            "sqlite://{}?mode=rwc",
            data_dir.join("threadline.db").display()
        );
        let db_pool = DatabasePool::new(&db_url).await?;

        let gateway = HttpAgentGateway::new(
            config.agent.base_url.clone(),
            config.agent.api_key.clone(),
        );

        Ok(Self::new(db_pool, config, Arc::new(gateway)))
    }

    /// Wire services over an existing pool and gateway.
    ///
    /// Used by `init` and directly by integration tests, which pass a
    /// tempfile-backed pool and a scripted gateway.
    pub fn new(db_pool: DatabasePool, config: &AppConfig, gateway: Arc<dyn AgentGateway>) -> Self {
        let token_issuer = JwtTokenIssuer::new(
            &config.auth.resolve_token_secret(),
            config.auth.access_ttl_minutes,
            config.auth.refresh_ttl_days,
        );

        let auth_service = AuthService::new(
            SqliteUserRepository::new(db_pool.clone()),
            Argon2PasswordHasher::new(),
            token_issuer,
        );

        let chat_service = ChatService::new(SqliteChatRepository::new(db_pool.clone()));

        Self {
            auth_service: Arc::new(auth_service),
            chat_service: Arc::new(chat_service),
            gateway,
            db_pool,
        }
    }
}
