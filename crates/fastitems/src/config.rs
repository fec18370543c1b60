//! Configuration loaded from environment variables.
//!
//! Every setting is read from a `FASTITEMS_`-prefixed variable, after an
//! optional `.env` file has been loaded:
//!
//! | variable | default |
//! |---|---|
//! | `FASTITEMS_HOST` | `127.0.0.1` |
//! | `FASTITEMS_PORT` | `8000` |
//! | `FASTITEMS_LOG_LEVEL` | `info` |
//! | `FASTITEMS_LOG_FORMAT` | `compact` (or `json`) |
//! | `FASTITEMS_BODY_LIMIT` | `1048576` |

use fastitems_core::DEFAULT_BODY_LIMIT;
use serde::Deserialize;
use thiserror::Error;

pub const ENV_PREFIX: &str = "FASTITEMS_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Env(#[from] envy::Error),

    #[error("body limit must be greater than zero")]
    ZeroBodyLimit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_format: LogFormat,
    pub body_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            log_level: "info".to_string(),
            log_format: LogFormat::Compact,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

impl AppConfig {
    /// Load `.env` (if present) and read the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        let config: Self = envy::prefixed(ENV_PREFIX).from_env()?;
        config.checked()
    }

    /// Read configuration from explicit `(name, value)` pairs.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config: Self = envy::prefixed(ENV_PREFIX).from_iter(vars)?;
        config.checked()
    }

    fn checked(self) -> Result<Self, ConfigError> {
        if self.body_limit == 0 {
            return Err(ConfigError::ZeroBodyLimit);
        }
        Ok(self)
    }

    /// Listen address, `host:port`.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
