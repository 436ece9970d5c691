//! Environment-driven server configuration.
//!
//! ```text
//! BIND_ADDR                   Listen address, default 0.0.0.0:8080
//! DATA_STORE_URL              Base URL of the hosted data store's REST API
//! DATA_STORE_SERVICE_KEY      Service key sent with every store request
//! DATA_STORE_TIMEOUT_SECONDS  Per-request timeout, default 30
//! ```
//!
//! When `DATA_STORE_URL` is unset the server falls back to the in-memory
//! store, which is only suitable for local development.

use std::env;
use std::time::Duration;

use url::Url;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Configuration errors raised while reading the environment.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} is not valid: {message}")]
    Invalid { name: String, message: String },
    #[error("{name} must be set when DATA_STORE_URL is set")]
    Missing { name: String },
}

/// Connection settings for the hosted data store.
#[derive(Debug, Clone)]
pub struct DataStoreConfig {
    pub base_url: Url,
    pub service_key: String,
    pub timeout: Duration,
}

/// Top-level server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub data_store: Option<DataStoreConfig>,
}

fn parse_timeout(raw: Option<String>) -> Result<Duration, ConfigError> {
    let Some(raw) = raw else {
        return Ok(Duration::from_secs(DEFAULT_TIMEOUT_SECONDS));
    };
    let seconds: u64 = raw.parse().map_err(|_| ConfigError::Invalid {
        name: "DATA_STORE_TIMEOUT_SECONDS".to_owned(),
        message: format!("expected a positive integer, got {raw:?}"),
    })?;
    if seconds == 0 {
        return Err(ConfigError::Invalid {
            name: "DATA_STORE_TIMEOUT_SECONDS".to_owned(),
            message: "timeout must be at least one second".to_owned(),
        });
    }
    Ok(Duration::from_secs(seconds))
}

fn parse_data_store(
    url: Option<String>,
    service_key: Option<String>,
    timeout: Option<String>,
) -> Result<Option<DataStoreConfig>, ConfigError> {
    let Some(url) = url else {
        return Ok(None);
    };
    let base_url: Url = url.parse().map_err(|e| ConfigError::Invalid {
        name: "DATA_STORE_URL".to_owned(),
        message: format!("{e}"),
    })?;
    let service_key = service_key
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| ConfigError::Missing {
            name: "DATA_STORE_SERVICE_KEY".to_owned(),
        })?;
    Ok(Some(DataStoreConfig {
        base_url,
        service_key,
        timeout: parse_timeout(timeout)?,
    }))
}

impl ServerConfig {
    /// Read configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error when a set variable fails to parse, or when the
    /// data store URL is set without its service key.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr =
            env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_owned());
        let data_store = parse_data_store(
            env::var("DATA_STORE_URL").ok(),
            env::var("DATA_STORE_SERVICE_KEY").ok(),
            env::var("DATA_STORE_TIMEOUT_SECONDS").ok(),
        )?;
        Ok(Self {
            bind_addr,
            data_store,
        })
    }
}
