//! Integral bot: socionics integral type calculations as Discord slash
//! commands.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use integral_bot::{BotConfig, IntegralBot};
//!
//! let bot = IntegralBot::new(BotConfig::from_env()?)?;
//! let registered = bot.deploy().await?;
//! let (outcome, replies) = bot.handle_json(payload).await?;
//! ```

pub mod bot;
pub mod commands;
pub mod config;
pub mod error;
pub mod registration;

pub use bot::IntegralBot;
pub use commands::{CommandSettings, EMBED_COLOR};
pub use config::{BotConfig, MAX_PAGINATION_LIMIT};
pub use error::{BotError, BotResult};
pub use registration::RegistrationClient;
