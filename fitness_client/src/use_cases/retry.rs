use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1000);

// Which failures are worth re-sending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryMode {
    // Retry every failure that is neither a network error nor 401/403.
    #[default]
    Compat,
    // Retry only server errors, timeouts, and broken or undecodable bodies.
    TransientOnly,
}

impl FromStr for RetryMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compat" => Ok(RetryMode::Compat),
            "transient" | "transient-only" | "transient_only" => Ok(RetryMode::TransientOnly),
            other => Err(format!("unknown retry mode '{other}'")),
        }
    }
}

// Fixed-delay, bounded retry policy applied to every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    // Attempts allowed after the first one.
    pub max_retries: u32,
    // Wait before each retry.
    pub delay: Duration,
    pub mode: RetryMode,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            delay: DEFAULT_RETRY_DELAY,
            mode: RetryMode::Compat,
        }
    }
}

// A failed attempt that is neither a network failure nor an auth rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    Status { status: u16, message: Option<String> },
    TimedOut(String),
    Interrupted(String),
    Malformed(String),
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Status { status, message } => {
                if let Some(message) = message {
                    write!(f, "upstream error {status}: {message}")
                } else {
                    write!(f, "upstream error {status}")
                }
            }
            Failure::TimedOut(err) => write!(f, "timed out: {err}"),
            Failure::Interrupted(err) => write!(f, "response interrupted: {err}"),
            Failure::Malformed(err) => write!(f, "malformed response body: {err}"),
        }
    }
}

impl RetryPolicy {
    pub fn is_retryable(&self, failure: &Failure) -> bool {
        match self.mode {
            RetryMode::Compat => true,
            RetryMode::TransientOnly => match failure {
                // 408 and 429 are explicit "try again later" answers.
                Failure::Status { status, .. } => *status >= 500 || matches!(status, 408 | 429),
                Failure::TimedOut(_) | Failure::Interrupted(_) | Failure::Malformed(_) => true,
            },
        }
    }
}
