//! Service configuration read from the environment.
//!
//! # Environment Variables
//!
//! - `API_HOST`: Host to bind to (default: 0.0.0.0)
//! - `API_PORT`: Port to listen on (default: 8080)
//! - `REQUEST_TIMEOUT_SECS`: Timeout for a whole HTTP request (default: 60)
//! - `CORS_ALLOW_ORIGIN`: Comma separated allowed origins, `*` for any (default: http://localhost:3000)
//! - `GITHUB_TOKEN`: Token used for every upstream call (required)
//! - `GITHUB_API_URL`: Root of the GitHub REST API (default: https://api.github.com)
//! - `UPSTREAM_TIMEOUT_SECS`: Timeout for each upstream call (default: 20)
//! - `MAX_FILE_SIZE`: Largest listed file in bytes (default: 1048576)
//! - `FETCH_CONCURRENCY`: Concurrent file fetches per request (default: 8)

use std::str::FromStr;
use std::time::Duration;

use github_client::{DEFAULT_API_URL, DEFAULT_REQUEST_TIMEOUT};
use repo_flattener_core::FlattenerConfig;

use crate::server::ApiConfig;

/// Errors found while reading the configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("Environment variable {name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Everything the binary needs to start.
#[derive(Clone)]
pub struct ServiceConfig {
    pub api: ApiConfig,
    pub github_token: String,
    pub github_api_url: String,
    pub upstream_timeout: Duration,
    pub flattener: FlattenerConfig,
}

impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("api", &self.api)
            .field("github_token", &"<redacted>")
            .field("github_api_url", &self.github_api_url)
            .field("upstream_timeout", &self.upstream_timeout)
            .field("flattener", &self.flattener)
            .finish()
    }
}

impl ServiceConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which returns the value of a
    /// variable if it is set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let github_token = get("GITHUB_TOKEN").ok_or(ConfigError::Missing("GITHUB_TOKEN"))?;

        let defaults = ApiConfig::default();
        let api = ApiConfig {
            host: get("API_HOST").unwrap_or(defaults.host),
            port: parse_or(&get, "API_PORT", defaults.port)?,
            request_timeout: Duration::from_secs(parse_or(
                &get,
                "REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )?),
            cors_allow_origin: get("CORS_ALLOW_ORIGIN").unwrap_or(defaults.cors_allow_origin),
        };

        let flattener_defaults = FlattenerConfig::default();
        let flattener = FlattenerConfig::default()
            .with_max_file_size(parse_or(&get, "MAX_FILE_SIZE", flattener_defaults.max_file_size)?)
            .with_fetch_concurrency(parse_or(
                &get,
                "FETCH_CONCURRENCY",
                flattener_defaults.fetch_concurrency,
            )?);

        Ok(Self {
            api,
            github_token,
            github_api_url: get("GITHUB_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            upstream_timeout: Duration::from_secs(parse_or(
                &get,
                "UPSTREAM_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT.as_secs(),
            )?),
            flattener,
        })
    }
}

fn parse_or<T, G>(get: &G, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(name) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
