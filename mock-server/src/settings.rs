//! Server settings from `STARTER_PORT`, `STARTER_ENV` and `STARTER_LOG`.

use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("failed to load server settings: {0}")]
pub struct SettingsError(#[from] config::ConfigError);

/// Deployment mode, read from `STARTER_ENV`. Development adds the read delay.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ServerSettings {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default, rename = "env")]
    pub environment: Environment,

    /// Filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log")]
    pub log: String,
}

impl ServerSettings {
    pub fn load() -> Result<Self, SettingsError> {
        dotenvy::dotenv().ok();
        Self::from_source(config::Environment::with_prefix("STARTER").try_parsing(true))
    }

    pub fn from_source(source: config::Environment) -> Result<Self, SettingsError> {
        Ok(config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()?)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], self.port))
    }
}

fn default_port() -> u16 {
    3000
}

fn default_log() -> String {
    "info,mock_server=debug,tower_http=debug".to_string()
}

/// Artificial latency applied by the example handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockSettings {
    pub read_delay: Duration,
    pub write_delay: Duration,
}

impl MockSettings {
    /// Reads wait 500ms in development only; writes always wait 1000ms.
    pub fn for_environment(environment: Environment) -> Self {
        let read_delay = if environment == Environment::Development {
            Duration::from_millis(500)
        } else {
            Duration::ZERO
        };
        Self {
            read_delay,
            write_delay: Duration::from_millis(1000),
        }
    }

    /// No delays at all.
    pub fn instant() -> Self {
        Self {
            read_delay: Duration::ZERO,
            write_delay: Duration::ZERO,
        }
    }
}

impl Default for MockSettings {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}
