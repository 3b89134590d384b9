//! Reply payloads and the capability used to send them.
//!
//! Payloads are plain data. Turning them into platform messages (and
//! delivering them) is the job of a [`Responder`] implementation.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;

/// Message shown when no handler matches the requested path.
pub const NOT_FOUND_MESSAGE: &str = "Command not found.";
/// Message shown when a handler fails.
pub const EXECUTION_FAILED_MESSAGE: &str = "Execution failed.";

/// Errors that can occur while sending a reply.
#[derive(Debug, Error)]
pub enum ReplyError {
    /// The platform refused the reply (e.g. already acknowledged).
    #[error("Reply rejected: {0}")]
    Rejected(String),

    /// The reply could not be delivered.
    #[error("Reply transport error: {0}")]
    Transport(String),
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A reply to an interaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Reply {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
    /// Only visible to the invoking user.
    #[serde(skip_serializing_if = "is_false")]
    pub ephemeral: bool,
}

impl Reply {
    /// A plain text reply.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    /// A reply carrying a single embed.
    pub fn embed(embed: Embed) -> Self {
        Self {
            embeds: vec![embed],
            ..Default::default()
        }
    }

    /// Make the reply visible only to the invoker.
    pub fn ephemeral(mut self) -> Self {
        self.ephemeral = true;
        self
    }

    /// Generic reply for an unknown command path.
    pub fn not_found() -> Self {
        Self::text(NOT_FOUND_MESSAGE).ephemeral()
    }

    /// Generic reply for a failed handler.
    pub fn execution_failed() -> Self {
        Self::text(EXECUTION_FAILED_MESSAGE).ephemeral()
    }
}

/// Rich embed content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    /// Name or URL of an image shown in the embed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Embed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline: false,
        });
        self
    }

    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// A titled field inside an embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "is_false")]
    pub inline: bool,
}

/// Capability to answer the interaction a handler is serving.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Send a reply.
    async fn reply(&self, reply: Reply) -> Result<(), ReplyError>;
}

/// Responder that keeps every reply in memory.
///
/// Used by the local dispatch driver and in tests.
#[derive(Debug, Default)]
pub struct CollectingResponder {
    replies: Mutex<Vec<Reply>>,
}

impl CollectingResponder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replies sent so far.
    pub async fn replies(&self) -> Vec<Reply> {
        self.replies.lock().await.clone()
    }

    /// Drain the collected replies.
    pub async fn take(&self) -> Vec<Reply> {
        std::mem::take(&mut *self.replies.lock().await)
    }
}

#[async_trait]
impl Responder for CollectingResponder {
    async fn reply(&self, reply: Reply) -> Result<(), ReplyError> {
        self.replies.lock().await.push(reply);
        Ok(())
    }
}
