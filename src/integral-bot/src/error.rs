//! Error types for the bot binary and its library surface.

use thiserror::Error;

use integral_commands::LoadError;

/// Errors that can occur while configuring, loading, or deploying the bot.
#[derive(Error, Debug)]
pub enum BotError {
    /// Configuration error (missing or invalid config).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML.
    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    /// Authentication error (invalid or revoked token).
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The platform API rejected a request.
    #[error("Discord API error: {0}")]
    Api(String),

    /// API rate limited.
    #[error("Rate limited: retry after {retry_after_secs} seconds")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// Network/HTTP error.
    #[error("Network error: {0}")]
    Network(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(String),

    /// Building the command tree failed.
    #[error("Command loading failed: {0}")]
    Load(#[from] LoadError),
}

impl From<reqwest::Error> for BotError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            BotError::Network(format!("Connection failed: {}", err))
        } else if err.is_decode() {
            BotError::Json(err.to_string())
        } else {
            BotError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for BotError {
    fn from(err: serde_json::Error) -> Self {
        BotError::Json(err.to_string())
    }
}

/// Result type for bot operations.
pub type BotResult<T> = std::result::Result<T, BotError>;
