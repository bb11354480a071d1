//! Configuration module for handling environment variables and .env files

use crate::error::RedditClientError;
use dotenv::dotenv;
use log::info;
use std::env;
use std::fmt;

pub const CLIENT_ID_VAR: &str = "REDDIT_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "REDDIT_CLIENT_SECRET";
pub const USER_AGENT_VAR: &str = "REDDIT_USER_AGENT";
pub const USERNAME_VAR: &str = "REDDIT_USERNAME";
pub const PASSWORD_VAR: &str = "REDDIT_PASSWORD";

/// Application configuration derived from environment variables and .env file
#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    // Reddit API credentials
    client_id: String,
    client_secret: String,
    user_agent: String,

    // Only used for the password grant
    username: Option<String>,
    password: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables and .env file
    ///
    /// Fails with [`RedditClientError::Configuration`] naming every mandatory
    /// variable that is unset or blank.
    pub fn load() -> Result<Self, RedditClientError> {
        // Try to load .env file, but continue even if it doesn't exist
        match dotenv() {
            Ok(_) => info!("Loaded environment from .env file"),
            Err(_) => info!("No .env file found, using system environment variables only"),
        }

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RedditClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let client_id = read(CLIENT_ID_VAR);
        let client_secret = read(CLIENT_SECRET_VAR);
        let user_agent = read(USER_AGENT_VAR);

        let missing: Vec<String> = [
            (CLIENT_ID_VAR, client_id.is_none()),
            (CLIENT_SECRET_VAR, client_secret.is_none()),
            (USER_AGENT_VAR, user_agent.is_none()),
        ]
        .iter()
        .filter(|(_, absent)| *absent)
        .map(|(name, _)| name.to_string())
        .collect();

        match (client_id, client_secret, user_agent) {
            (Some(client_id), Some(client_secret), Some(user_agent)) => Ok(Self {
                client_id,
                client_secret,
                user_agent,
                username: read(USERNAME_VAR),
                password: read(PASSWORD_VAR),
            }),
            _ => Err(RedditClientError::Configuration { missing }),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// True when both username and password are set, enabling the password grant.
    pub fn is_authenticated(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
