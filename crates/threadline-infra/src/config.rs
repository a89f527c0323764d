//! Configuration loader for Threadline.
//!
//! Reads `config.toml` from the data directory (`~/.threadline/` in
//! production) and deserializes it into [`AppConfig`]. Falls back to
//! defaults when the file is missing or malformed. Secrets can also come
//! from the environment: `THREADLINE_TOKEN_SECRET`, `THREADLINE_AGENT_URL`,
//! and `THREADLINE_AGENT_KEY` override the file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub agent: AgentConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// Token issuance settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 signing secret. When absent here and in the environment, an
    /// ephemeral secret is generated and tokens do not survive restarts.
    pub token_secret: Option<String>,
    pub access_ttl_minutes: i64,
    pub refresh_ttl_days: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: None,
            access_ttl_minutes: 60,
            refresh_ttl_days: 7,
        }
    }
}

/// Agent gateway settings.
///
/// The API key stays a plain string only until it reaches the gateway
/// client, which wraps it in `SecretString` at construction.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:2024".to_string(),
            api_key: None,
        }
    }
}

/// Resolve the data directory from `THREADLINE_DATA_DIR`, falling back to
/// `~/.threadline`.
pub fn resolve_data_dir() -> PathBuf {
    match std::env::var("THREADLINE_DATA_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".threadline")
        }
    }
}

/// Load configuration from `{data_dir}/config.toml`, then apply
/// environment overrides.
///
/// - Missing file: defaults.
/// - Unreadable or malformed file: warning, then defaults.
pub async fn load_config(data_dir: &Path) -> AppConfig {
    let config_path = data_dir.join("config.toml");

    let mut config = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => match toml::from_str::<AppConfig>(&content) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(
                    "Failed to parse {}: {err}, using defaults",
                    config_path.display()
                );
                AppConfig::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(
                "No config.toml found at {}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        }
        Err(err) => {
            tracing::warn!(
                "Failed to read {}: {err}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        }
    };

    if let Ok(secret) = std::env::var("THREADLINE_TOKEN_SECRET") {
        config.auth.token_secret = Some(secret);
    }
    if let Ok(url) = std::env::var("THREADLINE_AGENT_URL") {
        config.agent.base_url = url;
    }
    if let Ok(key) = std::env::var("THREADLINE_AGENT_KEY") {
        config.agent.api_key = Some(key);
    }

    config
}

impl AuthConfig {
    /// The signing secret to use, generating an ephemeral one when none is
    /// configured.
    pub fn resolve_token_secret(&self) -> String {
        match &self.token_secret {
            Some(secret) => secret.clone(),
            None => {
                tracing::warn!(
                    "no token secret configured; using an ephemeral one, \
                     issued tokens will not survive a restart"
                );
                generate_secret()
            }
        }
    }
}

fn generate_secret() -> String {
    use argon2::password_hash::rand_core::{OsRng, RngCore};

    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_returns_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).await;
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.auth.access_ttl_minutes, 60);
        assert_eq!(config.agent.base_url, "http://127.0.0.1:2024");
    }

    #[tokio::test]
    async fn test_valid_toml_is_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
[server]
host = "0.0.0.0"
port = 9001

[auth]
token_secret = "s3cret"
access_ttl_minutes = 15

[agent]
base_url = "http://agent.internal:2024"
"#,
        )
        .await
        .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9001);
        assert_eq!(config.auth.token_secret.as_deref(), Some("s3cret"));
        assert_eq!(config.auth.access_ttl_minutes, 15);
        // Unset sections keep their defaults
        assert_eq!(config.auth.refresh_ttl_days, 7);
        assert_eq!(config.agent.base_url, "http://agent.internal:2024");
    }

    #[tokio::test]
    async fn test_malformed_toml_returns_defaults() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_ephemeral_secret_is_generated_when_unset() {
        let config = AuthConfig::default();
        let a = config.resolve_token_secret();
        let b = config.resolve_token_secret();
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
    }

    #[test]
    fn test_configured_secret_is_stable() {
        let config = AuthConfig {
            token_secret: Some("s3cret".to_string()),
            ..AuthConfig::default()
        };
        assert_eq!(config.resolve_token_secret(), "s3cret");
    }
}
