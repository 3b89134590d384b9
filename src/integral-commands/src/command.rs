//! The command trait and the context handlers run in.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::interaction::{OptionValue, ResolvedInteraction};
use crate::reply::{Reply, ReplyError, Responder};
use crate::schema::CommandSchema;

/// Errors a command handler can fail with.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// A required option was not supplied.
    #[error("Missing option: {0}")]
    MissingOption(String),

    /// An option was supplied with an unusable value.
    #[error("Invalid option '{name}': {reason}")]
    InvalidOption { name: String, reason: String },

    /// Sending the reply failed.
    #[error(transparent)]
    Reply(#[from] ReplyError),

    /// Any other failure inside the handler.
    #[error("{0}")]
    Failed(String),
}

/// An invocable command: a schema plus a handler.
#[async_trait]
pub trait Command: Send + Sync {
    /// The schema registered with the platform.
    fn describe(&self) -> CommandSchema;

    /// Handle one invocation.
    async fn invoke(&self, ctx: &CommandContext) -> Result<(), HandlerError>;
}

/// Per-request state handed to a handler.
#[derive(Clone)]
pub struct CommandContext {
    interaction: ResolvedInteraction,
    responder: Arc<dyn Responder>,
}

impl std::fmt::Debug for CommandContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandContext")
            .field("interaction", &self.interaction)
            .finish_non_exhaustive()
    }
}

impl CommandContext {
    pub fn new(interaction: ResolvedInteraction, responder: Arc<dyn Responder>) -> Self {
        Self {
            interaction,
            responder,
        }
    }

    pub fn interaction(&self) -> &ResolvedInteraction {
        &self.interaction
    }

    /// String value of an option, if present.
    pub fn string_option(&self, name: &str) -> Option<&str> {
        self.interaction.option(name).and_then(OptionValue::as_str)
    }

    /// String value of a required option.
    pub fn required_string(&self, name: &str) -> Result<&str, HandlerError> {
        self.string_option(name)
            .ok_or_else(|| HandlerError::MissingOption(name.to_string()))
    }

    /// Send a reply to the invoking user.
    pub async fn reply(&self, reply: Reply) -> Result<(), HandlerError> {
        self.responder.reply(reply).await?;
        Ok(())
    }
}
