use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    pub gateway: GatewayConfig,
    /// Origins allowed to call the API cross-origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// PostgreSQL connection URL. When absent the gateway falls back to the
    /// in-memory store (data is lost on restart).
    #[serde(default)]
    pub postgres_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

/// Process-wide secrets, read from the environment at startup and handed to
/// the services that need them. Never logged.
#[derive(Clone)]
pub struct Secrets {
    pub token_secret: String,
    pub stripe_secret_key: String,
}

impl Secrets {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            token_secret: std::env::var("ACCESS_TOKEN_SECRET")
                .map_err(|_| anyhow::anyhow!("ACCESS_TOKEN_SECRET is not set"))?,
            stripe_secret_key: std::env::var("STRIPE_SECRET_KEY")
                .map_err(|_| anyhow::anyhow!("STRIPE_SECRET_KEY is not set"))?,
        })
    }
}

impl AppConfig {
    pub fn load(env: &str) -> anyhow::Result<Self> {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {}", config_path, e))?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let yaml = r#"
log_level: info
log_dir: ./logs
log_file: labbooker.log
use_json: false
rotation: daily
gateway:
  host: 0.0.0.0
  port: 5000
cors_origins:
  - http://localhost:5173
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.gateway.port, 5000);
        assert_eq!(config.cors_origins.len(), 1);
        assert!(config.postgres_url.is_none());
    }
}
