//! The bot's slash commands.
//!
//! ```text
//! help
//! chart
//! integral/
//!   calculate
//!   combinations/
//!     get
//!     subset
//! utility/
//!   calculate
//! ```

pub mod chart;
pub mod help;
pub mod integral;
pub mod utility;

use integral_algebra::{AlgebraError, Subset, TypeSymbol, enumerate};
use integral_commands::{
    CommandContext, CommandOption, Embed, HandlerError, Namespace, OptionChoice, Reply,
};

use crate::config::BotConfig;

/// Colour of every embed the bot sends.
pub const EMBED_COLOR: u32 = 0xf1c40f;

/// Settings the commands read at request time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSettings {
    /// Maximum number of types per request.
    pub max_types: usize,
    /// Lines per result page.
    pub page_size: usize,
}

impl From<&BotConfig> for CommandSettings {
    fn from(config: &BotConfig) -> Self {
        Self {
            max_types: config.max_subsets,
            page_size: config.pagination_limit,
        }
    }
}

/// The full command namespace.
pub fn namespace(settings: CommandSettings) -> Namespace {
    Namespace::root()
        .command("help", || Ok(help::HelpCommand))
        .command("chart", || Ok(chart::ChartCommand))
        .namespace(integral::namespace(settings))
        .namespace(utility::namespace(settings))
}

/// The `types` option shared by the calculating commands.
pub(crate) fn types_option() -> CommandOption {
    CommandOption::string(
        "types",
        "List of types in the three-letter notation (separated by space).",
    )
    .required()
}

/// The `target` option, offering every type as a choice.
pub(crate) fn target_option() -> CommandOption {
    CommandOption::string("target", "Target integral type.")
        .required()
        .with_choices(
            TypeSymbol::ALL
                .iter()
                .map(|t| OptionChoice::new(t.as_str(), t.as_str())),
        )
}

pub(crate) fn target(ctx: &CommandContext) -> Result<TypeSymbol, HandlerError> {
    let raw = ctx.required_string("target")?;
    raw.parse().map_err(|e: AlgebraError| HandlerError::InvalidOption {
        name: "target".to_string(),
        reason: e.to_string(),
    })
}

/// Ephemeral "wrong format" embed echoing the input.
pub(crate) fn wrong_format(input: &str, usage: &str, max_types: usize) -> Reply {
    let description = if input.trim().is_empty() { "_ _" } else { input };
    Reply::embed(
        Embed::new()
            .color(EMBED_COLOR)
            .title("❗️ Wrong format ❗️")
            .description(description)
            .field("Usage example", format!("`{}`", usage))
            .field(
                "Limit",
                format!("The number of types to process is limited to {}.", max_types),
            ),
    )
    .ephemeral()
}

/// Run the subset search on the blocking pool.
///
/// The search is exponential in `types.len()` and must not hold an async
/// worker while it runs.
pub(crate) async fn search(
    types: Vec<TypeSymbol>,
    target: TypeSymbol,
) -> Result<Vec<Subset>, HandlerError> {
    tokio::task::spawn_blocking(move || enumerate(&types, target))
        .await
        .map_err(|e| HandlerError::Failed(format!("enumeration task failed: {}", e)))?
        .map_err(|e| HandlerError::Failed(e.to_string()))
}

/// Split `lines` into pages of at most `page_size` lines.
pub(crate) fn paginate(lines: &[String], page_size: usize) -> Vec<String> {
    lines
        .chunks(page_size.max(1))
        .map(|chunk| chunk.join("\n"))
        .collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use integral_commands::{CollectingResponder, Command, ResolvedInteraction};

    use super::*;

    /// Invoke a command directly and collect its replies.
    pub(crate) async fn run(
        command: &dyn Command,
        interaction: ResolvedInteraction,
    ) -> Result<Vec<Reply>, HandlerError> {
        let responder = Arc::new(CollectingResponder::new());
        let ctx = CommandContext::new(interaction, responder.clone());
        command.invoke(&ctx).await?;
        Ok(responder.take().await)
    }
}
