use std::fmt;

pub const NETWORK_MESSAGE: &str = "Network error, please check your connection";
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";
pub const EXHAUSTED_MESSAGE: &str = "Request failed after multiple retries";

// Classified outcome of a failed API call. The Display text is what callers show to users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    // No response was received at all (DNS, refused connection, ...).
    Network,
    // The server answered 401 or 403; the stored token has been cleared.
    Unauthorized,
    // Every retry attempt failed with a transient error.
    Exhausted,
    // Anything else, with the underlying message passed through unchanged.
    Other(String),
}

impl ApiError {
    pub fn other(message: impl Into<String>) -> Self {
        ApiError::Other(message.into())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network => f.write_str(NETWORK_MESSAGE),
            ApiError::Unauthorized => f.write_str(UNAUTHORIZED_MESSAGE),
            ApiError::Exhausted => f.write_str(EXHAUSTED_MESSAGE),
            ApiError::Other(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for ApiError {}

// Failure reported by a transport before any status could be classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    // Connection could not be established; no response exists.
    Unreachable(String),
    // The transport gave up waiting on the server.
    TimedOut(String),
    // A response started but its body could not be read to the end.
    Interrupted(String),
    // The request could not be built (bad URL, header, ...).
    InvalidRequest(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Unreachable(err) => write!(f, "server unreachable: {err}"),
            TransportError::TimedOut(err) => write!(f, "request timed out: {err}"),
            TransportError::Interrupted(err) => write!(f, "response interrupted: {err}"),
            TransportError::InvalidRequest(err) => write!(f, "invalid request: {err}"),
        }
    }
}

impl std::error::Error for TransportError {}
