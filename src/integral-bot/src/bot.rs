//! The bot: configuration plus the loaded command registry.

use std::sync::Arc;

use tracing::{debug, info, warn};

use integral_commands::{
    CollectingResponder, CommandContext, CommandLoader, CommandRegistry, CommandSchema,
    DispatchOutcome, InteractionPayload, LoaderOptions, Reply, Responder,
};

use crate::commands::{self, CommandSettings};
use crate::config::BotConfig;
use crate::error::BotResult;
use crate::registration::RegistrationClient;

/// A ready-to-serve bot.
///
/// Cheap to clone; the registry is shared.
#[derive(Debug, Clone)]
pub struct IntegralBot {
    config: BotConfig,
    registry: Arc<CommandRegistry>,
}

impl IntegralBot {
    /// Load the command tree.
    ///
    /// Fails only on structural errors, or on any broken definition when
    /// `strict_loading` is set.
    pub fn new(config: BotConfig) -> BotResult<Self> {
        config.validate()?;

        let loader = CommandLoader::with_options(LoaderOptions {
            strict: config.strict_loading,
        });
        let namespace = commands::namespace(CommandSettings::from(&config));
        let registry = CommandRegistry::load(&namespace, &loader)?;

        let skipped = registry.report().skipped.len();
        if skipped > 0 {
            warn!("{} command definitions were skipped", skipped);
        }
        info!("Registered commands: {}", registry.names().join(", "));

        Ok(Self {
            config,
            registry: Arc::new(registry),
        })
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<CommandRegistry> {
        &self.registry
    }

    /// The registration payload.
    pub fn schemas(&self) -> Vec<CommandSchema> {
        self.registry.schemas()
    }

    /// Register every command, in the configured guild if any, else globally.
    pub async fn deploy(&self) -> BotResult<usize> {
        let client = RegistrationClient::new(&self.config)?;
        client
            .register(self.config.guild_id.as_deref(), &self.schemas())
            .await
    }

    /// Dispatch one interaction, replying through `responder`.
    pub async fn handle(
        &self,
        payload: InteractionPayload,
        responder: Arc<dyn Responder>,
    ) -> DispatchOutcome {
        let interaction = payload.resolve();
        debug!(
            user = interaction.user_id.as_deref().unwrap_or("-"),
            "Received {}",
            interaction.path()
        );
        let ctx = CommandContext::new(interaction, responder);
        self.registry.dispatch(&ctx).await
    }

    /// Dispatch a JSON interaction payload and collect the replies.
    pub async fn handle_json(&self, json: &str) -> BotResult<(DispatchOutcome, Vec<Reply>)> {
        let payload: InteractionPayload = serde_json::from_str(json)?;
        let responder = Arc::new(CollectingResponder::new());
        let outcome = self.handle(payload, responder.clone()).await;
        Ok((outcome, responder.take().await))
    }
}
