//! Bot configuration.
//!
//! Loaded either from a TOML file or from environment variables (after
//! `.env` has been read by the binary):
//!
//! | Variable | Field | Default |
//! |---|---|---|
//! | `DISCORD_TOKEN` | `token` | required for deploys |
//! | `DISCORD_CLIENT_ID` | `client_id` | required for deploys |
//! | `DISCORD_GUILD_ID` | `guild_id` | unset (global commands) |
//! | `DISCORD_API_BASE` | `api_base` | `https://discord.com/api/v10` |
//! | `INTEGRAL_MAX_SUBSETS` | `max_subsets` | `10` |
//! | `INTEGRAL_PAGINATION_LIMIT` | `pagination_limit` | `10` (at most 40) |
//! | `INTEGRAL_STRICT_LOADING` | `strict_loading` | `false` |

use std::path::Path;
use std::str::FromStr;

use secrecy::SecretString;
use serde::Deserialize;
use tracing::debug;

use integral_algebra::MAX_TYPES_LIMIT;

use crate::error::{BotError, BotResult};

/// Largest accepted `pagination_limit`. A page of twenty-type subset lines
/// must fit the 4096 character embed description.
pub const MAX_PAGINATION_LIMIT: usize = 40;

/// Default Discord REST API base URL.
pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_max_subsets() -> usize {
    10
}

fn default_pagination_limit() -> usize {
    10
}

/// Configuration for the bot.
#[derive(Clone, Deserialize)]
pub struct BotConfig {
    /// Bot token used for API calls.
    #[serde(default)]
    token: Option<SecretString>,

    /// Application (client) ID.
    #[serde(default)]
    pub client_id: Option<String>,

    /// Register commands in this guild only.
    #[serde(default)]
    pub guild_id: Option<String>,

    /// REST API base URL.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Maximum number of types accepted per request.
    #[serde(default = "default_max_subsets")]
    pub max_subsets: usize,

    /// Lines per result page.
    #[serde(default = "default_pagination_limit")]
    pub pagination_limit: usize,

    /// Abort startup on the first broken command definition.
    #[serde(default)]
    pub strict_loading: bool,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: None,
            client_id: None,
            guild_id: None,
            api_base: default_api_base(),
            max_subsets: default_max_subsets(),
            pagination_limit: default_pagination_limit(),
            strict_loading: false,
        }
    }
}

impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("client_id", &self.client_id)
            .field("guild_id", &self.guild_id)
            .field("api_base", &self.api_base)
            .field("max_subsets", &self.max_subsets)
            .field("pagination_limit", &self.pagination_limit)
            .field("strict_loading", &self.strict_loading)
            .finish()
    }
}

impl BotConfig {
    /// Load from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> BotResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        debug!("Loaded config from {}", path.display());
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables.
    pub fn from_env() -> BotResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> BotResult<Self> {
        let mut config = Self::default();

        if let Some(token) = lookup("DISCORD_TOKEN") {
            config.token = Some(SecretString::new(token.into()));
        }
        config.client_id = lookup("DISCORD_CLIENT_ID");
        config.guild_id = lookup("DISCORD_GUILD_ID");

        if let Some(base) = lookup("DISCORD_API_BASE") {
            config.api_base = base;
        }
        if let Some(value) = lookup("INTEGRAL_MAX_SUBSETS") {
            config.max_subsets = parse_var("INTEGRAL_MAX_SUBSETS", &value)?;
        }
        if let Some(value) = lookup("INTEGRAL_PAGINATION_LIMIT") {
            config.pagination_limit = parse_var("INTEGRAL_PAGINATION_LIMIT", &value)?;
        }
        if let Some(value) = lookup("INTEGRAL_STRICT_LOADING") {
            config.strict_loading = parse_var("INTEGRAL_STRICT_LOADING", &value)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> BotResult<()> {
        if !(1..=MAX_TYPES_LIMIT).contains(&self.max_subsets) {
            return Err(BotError::Config(format!(
                "max_subsets must be between 1 and {}, got {}",
                MAX_TYPES_LIMIT, self.max_subsets
            )));
        }
        if !(1..=MAX_PAGINATION_LIMIT).contains(&self.pagination_limit) {
            return Err(BotError::Config(format!(
                "pagination_limit must be between 1 and {}, got {}",
                MAX_PAGINATION_LIMIT, self.pagination_limit
            )));
        }
        if self.api_base.is_empty() {
            return Err(BotError::Config("api_base cannot be empty".to_string()));
        }
        Ok(())
    }

    /// Set the token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::new(token.into().into()));
        self
    }

    /// Token and application ID, both required to talk to the API.
    pub fn credentials(&self) -> BotResult<(&SecretString, &str)> {
        let token = self
            .token
            .as_ref()
            .ok_or_else(|| BotError::Config("DISCORD_TOKEN not set".to_string()))?;
        let client_id = self
            .client_id
            .as_deref()
            .ok_or_else(|| BotError::Config("DISCORD_CLIENT_ID not set".to_string()))?;
        Ok((token, client_id))
    }
}

fn parse_var<T: FromStr>(name: &str, value: &str) -> BotResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| BotError::Config(format!("{} has an invalid value: {}", name, value)))
}
