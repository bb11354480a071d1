use thiserror::Error;

/// Errors surfaced by every operation of the client.
///
/// Parameter and configuration errors are raised locally before any request
/// is made. The remaining kinds translate failures reported by the Reddit
/// access layer and keep the upstream message.
#[derive(Debug, Error)]
pub enum RedditClientError {
    /// One or more mandatory environment variables are missing or blank.
    #[error("Missing required environment variables: {}", missing.join(", "))]
    Configuration { missing: Vec<String> },

    #[error("Invalid value for {name}: {message}")]
    InvalidParameter { name: String, message: String },

    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Reddit throttled the request. No retry is attempted here.
    #[error("Rate limited: {message}")]
    RateLimit {
        message: String,
        retry_after: Option<u64>,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Transport error: {0}")]
    Transport(String),

    /// Failure writing command output to disk
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RedditClientError {
    pub(crate) fn invalid(name: &str, message: impl Into<String>) -> Self {
        RedditClientError::InvalidParameter {
            name: name.to_string(),
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for RedditClientError {
    fn from(err: reqwest::Error) -> Self {
        RedditClientError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for RedditClientError {
    fn from(err: serde_json::Error) -> Self {
        RedditClientError::Transport(format!("invalid response body: {}", err))
    }
}
