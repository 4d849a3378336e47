//! Client configuration loaded from the environment.
//!
//! The only setting is the API base URL. It is resolved once at startup;
//! an unset or blank variable falls back to the local development server.

use std::env;

/// Environment variable holding the API base URL.
pub const BASE_URL_VAR: &str = "RUNLOG_API_BASE_URL";

/// Base URL used when `RUNLOG_API_BASE_URL` is unset or blank.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Absolute `http`/`https` URL the resource paths are appended to.
    pub api_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// Validate an explicit base URL.
    pub fn new(api_base_url: &str) -> Result<Self, ConfigError> {
        let url = reqwest::Url::parse(api_base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: api_base_url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(url.scheme().to_string()));
        }
        Ok(Self {
            api_base_url: api_base_url.to_string(),
        })
    }

    /// Load configuration from environment variables, reading `.env` first
    /// if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        match lookup(BASE_URL_VAR).map(|v| v.trim().to_string()) {
            Some(url) if !url.is_empty() => {
                tracing::debug!(base_url = %url, "using configured API base URL");
                Self::new(&url)
            }
            _ => {
                tracing::debug!(base_url = DEFAULT_BASE_URL, "API base URL not set, using default");
                Ok(Self::default())
            }
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid RUNLOG_API_BASE_URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("unsupported URL scheme {0:?}, expected http or https")]
    UnsupportedScheme(String),
}
