//! # configs
//!
//! Layered application configuration. Sources, later ones winning:
//!
//! 1. built-in defaults
//! 2. `config/default.toml` (optional)
//! 3. `config/local.toml` (optional)
//! 4. `FORUM__*` environment variables, `__` separating nested keys
//!    (e.g. `FORUM__SERVER__PORT=8080`, `FORUM__DATABASE__URL=...`)
//!
//! A `.env` file in the working directory is loaded into the environment
//! first.

use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

pub const ENV_PREFIX: &str = "FORUM";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// sqlx connection URL, e.g. `sqlite:forum.db?mode=rwc` or `sqlite::memory:`.
    pub url: SecretString,
    pub max_connections: u32,
    pub busy_timeout_ms: u64,
}

impl DatabaseConfig {
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive, overridden by `RUST_LOG`.
    pub level: String,
    pub format: LogFormat,
}

impl AppConfig {
    /// Loads `.env`, then every configuration layer.
    pub fn load() -> Result<Self, ConfigError> {
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                tracing::warn!(error = %err, "ignoring unreadable .env file");
            }
        }
        Self::from_sources(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
    }

    /// Builds the configuration from defaults, the optional files and `env`.
    pub fn from_sources<S>(env: S) -> Result<Self, ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        use config::{Config, File};

        let config: AppConfig = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("database.url", "sqlite:forum.db?mode=rwc")?
            .set_default("database.max_connections", 8)?
            .set_default("database.busy_timeout_ms", 5000)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(env)
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid("database.max_connections must be at least 1".into()));
        }
        if self.server.host.is_empty() {
            return Err(ConfigError::Invalid("server.host must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> config::Environment {
        let source: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
            .source(Some(source))
    }

    #[test]
    fn defaults_apply_without_overrides() {
        let config = AppConfig::from_sources(env(&[])).unwrap();
        assert_eq!(config.server.bind_addr(), "0.0.0.0:5000");
        assert_eq!(config.database.url.expose_secret(), "sqlite:forum.db?mode=rwc");
        assert_eq!(config.database.busy_timeout(), Duration::from_millis(5000));
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = AppConfig::from_sources(env(&[
            ("FORUM__SERVER__PORT", "8080"),
            ("FORUM__DATABASE__URL", "sqlite::memory:"),
            ("FORUM__LOGGING__FORMAT", "json"),
        ]))
        .unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.url.expose_secret(), "sqlite::memory:");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn zero_connections_is_rejected() {
        let err = AppConfig::from_sources(env(&[("FORUM__DATABASE__MAX_CONNECTIONS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
