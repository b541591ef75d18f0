//! Robot webservice configuration parsing from environment variables.
//!
//! Credentials are mandatory; everything else has a default:
//! - `HETZNER_USER` / `HETZNER_PASS` (required, non-empty)
//! - `HETZNER_ROBOT_URL` (default `https://robot-ws.your-server.de`)
//! - `HETZNER_HTTP_TIMEOUT_SECS` (default 30, at least 1)
//! - `HETZNER_HTTP_MAX_RETRIES` (default 3)

use crate::domain::errors::ConfigError;
use std::env;
use std::fmt;
use std::time::Duration;
use url::Url;

pub const DEFAULT_ROBOT_URL: &str = "https://robot-ws.your-server.de";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Basic auth credentials for the Robot webservice user
#[derive(Clone)]
pub struct RobotCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for RobotCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RobotCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Transport limits for the HTTP client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpClientSettings {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub max_retries: u32,
}

impl Default for HttpClientSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(10),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RobotEnvConfig {
    pub credentials: RobotCredentials,
    pub base_url: Url,
    pub http: HttpClientSettings,
}

impl RobotEnvConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let username = required(&lookup, "HETZNER_USER")?;
        let password = required(&lookup, "HETZNER_PASS")?;

        let raw_url = lookup("HETZNER_ROBOT_URL").unwrap_or_else(|| DEFAULT_ROBOT_URL.to_string());
        let base_url = Url::parse(&raw_url).map_err(|e| ConfigError::InvalidValue {
            var: "HETZNER_ROBOT_URL",
            value: raw_url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidValue {
                var: "HETZNER_ROBOT_URL",
                value: raw_url,
                reason: "not a base URL".to_string(),
            });
        }

        let defaults = HttpClientSettings::default();
        let timeout = parse_or(&lookup, "HETZNER_HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        if timeout == 0 {
            return Err(ConfigError::InvalidValue {
                var: "HETZNER_HTTP_TIMEOUT_SECS",
                value: timeout.to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        let max_retries = parse_or(&lookup, "HETZNER_HTTP_MAX_RETRIES", DEFAULT_MAX_RETRIES)?;

        Ok(Self {
            credentials: RobotCredentials { username, password },
            base_url,
            http: HttpClientSettings {
                timeout: Duration::from_secs(timeout),
                max_retries,
                ..defaults
            },
        })
    }
}

fn required<F>(lookup: &F, var: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::MissingCredential(var))
}

fn parse_or<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => {
            let parsed = value.trim().parse::<T>();
            parsed.map_err(|e| ConfigError::InvalidValue {
                var,
                reason: e.to_string(),
                value,
            })
        }
    }
}
