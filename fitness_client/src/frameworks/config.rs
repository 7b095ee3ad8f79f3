use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::use_cases::retry::{DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY, RetryMode, RetryPolicy};

// Runtime settings, read once at process start.

pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
// Relative to $HOME when it is set, otherwise to the working directory.
pub const DEFAULT_TOKEN_FILE: &str = ".fitness/token.json";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
    pub token_file: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidUrl { value: String, reason: String },
    InvalidNumber { key: &'static str, value: String },
    InvalidRetryMode(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidUrl { value, reason } => {
                write!(f, "API_URL '{value}' is not a valid http(s) url: {reason}")
            }
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} has an invalid value '{value}'")
            }
            ConfigError::InvalidRetryMode(reason) => write!(f, "API_RETRY_MODE: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    // Same as `from_env`, with the variable source injected for tests.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup("API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        validate_base_url(&base_url)?;

        // A zero timeout would fail every attempt before it is sent.
        let timeout = match read_u64(&lookup, "API_TIMEOUT_MS")? {
            Some(0) => {
                return Err(ConfigError::InvalidNumber {
                    key: "API_TIMEOUT_MS",
                    value: "0".to_string(),
                });
            }
            Some(millis) => Duration::from_millis(millis),
            None => DEFAULT_TIMEOUT,
        };

        let max_retries = match read_u64(&lookup, "API_MAX_RETRIES")? {
            Some(value) => u32::try_from(value).map_err(|_| ConfigError::InvalidNumber {
                key: "API_MAX_RETRIES",
                value: value.to_string(),
            })?,
            None => DEFAULT_MAX_RETRIES,
        };
        let delay = read_u64(&lookup, "API_RETRY_DELAY_MS")?
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_RETRY_DELAY);
        let mode = match lookup("API_RETRY_MODE") {
            Some(value) => value
                .parse::<RetryMode>()
                .map_err(ConfigError::InvalidRetryMode)?,
            None => RetryMode::default(),
        };

        let token_file = match lookup("FITNESS_TOKEN_FILE") {
            Some(path) => PathBuf::from(path),
            None => match lookup("HOME") {
                Some(home) => PathBuf::from(home).join(DEFAULT_TOKEN_FILE),
                None => PathBuf::from(DEFAULT_TOKEN_FILE),
            },
        };

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            retry: RetryPolicy {
                max_retries,
                delay,
                mode,
            },
            token_file,
        })
    }
}

fn validate_base_url(value: &str) -> Result<(), ConfigError> {
    let parsed = url::Url::parse(value).map_err(|err| ConfigError::InvalidUrl {
        value: value.to_string(),
        reason: err.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            value: value.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }
    Ok(())
}

fn read_u64(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<u64>, ConfigError> {
    lookup(key)
        .map(|value| {
            value
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidNumber { key, value })
        })
        .transpose()
}
