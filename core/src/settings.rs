//! Client settings loaded from the environment.
//!
//! Variables use the `STARTER_` prefix: `STARTER_API_URL`, `STARTER_SITE_URL`,
//! `STARTER_ENV` and `STARTER_TOKEN_DIR`. A `.env` file is read first when
//! present. Every value has a default, so an empty environment is valid.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub const ENV_PREFIX: &str = "STARTER";

/// Fixed timeout for every API call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_SITE_URL: &str = "http://localhost:3000";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid {key}: {source}")]
    InvalidUrl {
        key: &'static str,
        #[source]
        source: url::ParseError,
    },
}

/// Deployment mode, read from `STARTER_ENV`. Development adds request logging.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Settings {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_site_url")]
    pub site_url: String,

    #[serde(default, rename = "env")]
    pub environment: Environment,

    /// Directory for the persistent token file. Memory storage when unset.
    #[serde(default)]
    pub token_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            site_url: default_site_url(),
            environment: Environment::default(),
            token_dir: None,
        }
    }
}

impl Settings {
    /// Load from `.env` and the process environment, then validate.
    pub fn load() -> Result<Self, SettingsError> {
        dotenvy::dotenv().ok();
        Self::from_source(config::Environment::with_prefix(ENV_PREFIX))
    }

    /// Load from an explicit environment source.
    pub fn from_source(source: config::Environment) -> Result<Self, SettingsError> {
        let settings: Settings = config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        url::Url::parse(&self.api_url)
            .map_err(|source| SettingsError::InvalidUrl { key: "api_url", source })?;
        url::Url::parse(&self.site_url)
            .map_err(|source| SettingsError::InvalidUrl { key: "site_url", source })?;
        Ok(())
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn timeout(&self) -> Duration {
        REQUEST_TIMEOUT
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_site_url() -> String {
    DEFAULT_SITE_URL.to_string()
}
